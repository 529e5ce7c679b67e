pub mod damage_synchronizer;
pub mod health_tracker;
