pub mod transport_model;
