pub mod indicator;
pub mod map_request;
pub mod missing_values;
