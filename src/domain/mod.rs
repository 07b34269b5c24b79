pub mod scheduling_model;
