// Domain layer: records, tables and the ports the pipeline talks through.

pub mod model;
pub mod ports;
pub mod table;
