use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::command::EnvVar;
use crate::{exactly_one, is_false, EntityKind, Identified};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exposure {
    Public,
    Internal,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
    Ws,
    Wss,
    Tcp,
    Udp,
}

/// A network endpoint. `target_port` is unique across the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Endpoint {
    pub name: String,
    pub target_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposure: Option<Exposure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContainerComponent {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_sources: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_mapping: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VolumeComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ephemeral: bool,
}

/// Kubernetes-style manifest content: a uri or an inlined document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContentWire", into = "ContentWire")]
pub enum ContentSource {
    Uri(String),
    Inlined(String),
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inlined: Option<String>,
}

impl TryFrom<ContentWire> for ContentSource {
    type Error = String;

    fn try_from(wire: ContentWire) -> Result<Self, Self::Error> {
        exactly_one(
            "kubernetes-like component",
            &["uri", "inlined"],
            [
                wire.uri.map(ContentSource::Uri),
                wire.inlined.map(ContentSource::Inlined),
            ],
        )
    }
}

impl From<ContentSource> for ContentWire {
    fn from(source: ContentSource) -> Self {
        match source {
            ContentSource::Uri(u) => ContentWire {
                uri: Some(u),
                inlined: None,
            },
            ContentSource::Inlined(i) => ContentWire {
                uri: None,
                inlined: Some(i),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Container,
    Volume,
    Kubernetes,
    Openshift,
}

impl ComponentType {
    pub const ALL: [ComponentType; 4] = [
        ComponentType::Container,
        ComponentType::Volume,
        ComponentType::Kubernetes,
        ComponentType::Openshift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Container => "container",
            ComponentType::Volume => "volume",
            ComponentType::Kubernetes => "kubernetes",
            ComponentType::Openshift => "openshift",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown component type: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    Container(ContainerComponent),
    Volume(VolumeComponent),
    Kubernetes(ContentSource),
    Openshift(ContentSource),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ComponentWire", into = "ComponentWire")]
pub struct Component {
    pub name: String,
    pub kind: ComponentKind,
}

impl Component {
    pub fn component_type(&self) -> ComponentType {
        match &self.kind {
            ComponentKind::Container(_) => ComponentType::Container,
            ComponentKind::Volume(_) => ComponentType::Volume,
            ComponentKind::Kubernetes(_) => ComponentType::Kubernetes,
            ComponentKind::Openshift(_) => ComponentType::Openshift,
        }
    }

    pub fn container(&self) -> Option<&ContainerComponent> {
        match &self.kind {
            ComponentKind::Container(c) => Some(c),
            _ => None,
        }
    }
}

impl Identified for Component {
    const KIND: EntityKind = EntityKind::Component;

    fn identity(&self) -> &str {
        &self.name
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComponentWire {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    container: Option<ContainerComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    volume: Option<VolumeComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kubernetes: Option<ContentSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    openshift: Option<ContentSource>,
}

impl TryFrom<ComponentWire> for Component {
    type Error = String;

    fn try_from(wire: ComponentWire) -> Result<Self, Self::Error> {
        let kind = exactly_one(
            &format!("component {}", wire.name),
            &["container", "volume", "kubernetes", "openshift"],
            [
                wire.container.map(ComponentKind::Container),
                wire.volume.map(ComponentKind::Volume),
                wire.kubernetes.map(ComponentKind::Kubernetes),
                wire.openshift.map(ComponentKind::Openshift),
            ],
        )?;
        Ok(Component {
            name: wire.name,
            kind,
        })
    }
}

impl From<Component> for ComponentWire {
    fn from(component: Component) -> Self {
        let mut wire = ComponentWire {
            name: component.name,
            container: None,
            volume: None,
            kubernetes: None,
            openshift: None,
        };
        match component.kind {
            ComponentKind::Container(c) => wire.container = Some(c),
            ComponentKind::Volume(v) => wire.volume = Some(v),
            ComponentKind::Kubernetes(k) => wire.kubernetes = Some(k),
            ComponentKind::Openshift(o) => wire.openshift = Some(o),
        }
        wire
    }
}
