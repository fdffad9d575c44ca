pub mod copy_button;
pub mod flow_diagram;
pub mod timers;
pub mod typing;
