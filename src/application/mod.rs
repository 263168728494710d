// Application layer - Capability seams and the kiosk control loop
pub mod controller;
pub mod hardware;
pub mod provisioner;
