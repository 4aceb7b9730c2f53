mod application;
mod controllers;
mod core;

pub(crate) use application::{ApplicationDeps, build_application};
pub(crate) use controllers::build_controllers;
pub(crate) use core::{CoreBootstrap, build_core};
