use devfile_schema::{
    Component, ComponentKind, ComponentType, ContainerComponent, ContentSource, Endpoint, Exposure,
    Protocol, SchemaWriter, VolumeComponent,
};

use crate::store::TestDevfile;

const EXPOSURES: [Exposure; 3] = [Exposure::Public, Exposure::Internal, Exposure::None];
const PROTOCOLS: [Protocol; 6] = [
    Protocol::Http,
    Protocol::Https,
    Protocol::Ws,
    Protocol::Wss,
    Protocol::Tcp,
    Protocol::Udp,
];

impl<W: SchemaWriter> TestDevfile<W> {
    pub(crate) fn build_component(&mut self, component_type: ComponentType) -> Component {
        let name = self.ctx.unique_string(8, true);
        let kind = match component_type {
            ComponentType::Container => {
                let mut container = ContainerComponent::default();
                self.roll_container(&mut container);
                ComponentKind::Container(container)
            }
            ComponentType::Volume => {
                let mut volume = VolumeComponent::default();
                self.roll_volume(&mut volume);
                ComponentKind::Volume(volume)
            }
            ComponentType::Kubernetes => ComponentKind::Kubernetes(self.content_source()),
            ComponentType::Openshift => ComponentKind::Openshift(self.content_source()),
        };
        Component { name, kind }
    }

    /// Releases the ports of any previous endpoints before re-rolling them.
    pub(crate) fn roll_container(&mut self, container: &mut ContainerComponent) {
        for endpoint in &container.endpoints {
            self.used_ports.remove(&endpoint.target_port);
        }
        let ctx = self.ctx.clone();

        container.image = format!("{}:{}", ctx.random_string(8, true), ctx.bounded(20));
        container.memory_limit = ctx.binary().then(|| format!("{}Mi", ctx.bounded(1024)));
        container.mount_sources = ctx.binary().then(|| ctx.binary());
        container.source_mapping = ctx
            .binary()
            .then(|| format!("/{}", ctx.random_string(8, true)));
        container.env = if ctx.binary() {
            self.random_env()
        } else {
            Vec::new()
        };
        container.args = if ctx.binary() {
            (0..ctx.bounded(3)).map(|_| ctx.random_string(6, false)).collect()
        } else {
            Vec::new()
        };
        container.command = if ctx.binary() {
            (0..ctx.bounded(3)).map(|_| ctx.random_string(6, false)).collect()
        } else {
            Vec::new()
        };
        container.endpoints = if ctx.binary() {
            (0..ctx.bounded(3)).map(|_| self.random_endpoint()).collect()
        } else {
            Vec::new()
        };
    }

    fn random_endpoint(&mut self) -> Endpoint {
        let target_port = self.allocate_port();
        let ctx = &self.ctx;
        Endpoint {
            name: ctx.unique_string(6, true),
            target_port,
            exposure: ctx.binary().then(|| ctx.pick(&EXPOSURES).copied()).flatten(),
            protocol: ctx.binary().then(|| ctx.pick(&PROTOCOLS).copied()).flatten(),
            secure: ctx.binary(),
            path: ctx.binary().then(|| format!("/{}", ctx.random_string(6, true))),
        }
    }

    pub(crate) fn roll_volume(&mut self, volume: &mut VolumeComponent) {
        volume.size = self.ctx.binary().then(|| format!("{}Gi", self.ctx.bounded(16)));
        volume.ephemeral = self.ctx.binary();
    }

    pub(crate) fn content_source(&self) -> ContentSource {
        if self.ctx.binary() {
            let len = self.ctx.bounded(24);
            ContentSource::Uri(format!("http://{}", self.ctx.random_string(len, false)))
        } else {
            let len = self.ctx.bounded(12);
            ContentSource::Inlined(self.ctx.random_string(len, false))
        }
    }
}
