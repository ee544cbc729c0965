use crate::core::ProcessResult;

pub trait ProcessorBase {
    fn get_number_of_cores(&self) -> usize;
    ///Advance every core by one cycle in a fixed order and return one result per core.
    fn process(&mut self) -> Vec<ProcessResult>;
    fn get_total_energy(&self) -> f64;
    fn get_in_flight_work(&self) -> f64;
    fn get_average_speed(&self) -> Option<f64>;
}
