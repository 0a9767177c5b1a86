pub mod explorer {
    pub use ard_explorer::*;
}

pub mod inspect {
    pub use ard_inspect::*;
}

pub mod log {
    pub use ard_log::*;
}

pub mod math {
    pub use ard_math::*;
}

pub mod prelude {
    pub use ard_explorer::{
        host::{ComponentKind, ComponentType, EcsHost, Entity, EntityQuery},
        panel::{ObjectPanel, PanelEntry},
        settings::ExplorerSettings,
        ExplorerSession,
    };
    pub use ard_inspect::prelude::*;
}
