// Command implementations for the folio binary

pub mod commands;
pub mod logging;
pub mod site;
