// Interface adapters: headless map surface, controls, fixtures and the operator protocol.

pub mod clock;
pub mod controls;
pub mod fixtures;
pub mod headless;
pub mod operator;
pub mod protocol;
