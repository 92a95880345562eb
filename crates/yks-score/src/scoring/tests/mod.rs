mod common;
mod guard;
mod routing;
mod service;
