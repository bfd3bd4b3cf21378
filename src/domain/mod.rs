// Domain layer: request/response models and ports (interfaces) to the outside world.

pub mod event;
pub mod model;
pub mod ports;
