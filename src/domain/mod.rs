// Domain layer: trip model, pure check logic and ports (interfaces). No browser or SMTP code here.

pub mod alert;
pub mod availability;
pub mod calendar;
pub mod model;
pub mod ports;
