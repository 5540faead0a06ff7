pub mod deploy;
pub mod kill;
pub mod status;
pub mod uninstall;
