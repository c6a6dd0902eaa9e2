// Application layer - Use case interactors

pub mod build_interactor;
pub mod container;
pub mod inspect_interactor;

// Re-export interactors
pub use build_interactor::{BuildInteractor, BuildReport, BuildRequest};
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::{InspectFormat, InspectInteractor, InspectRequest, InspectResponse};
