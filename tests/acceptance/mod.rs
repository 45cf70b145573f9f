//! End-to-end scenarios for the firmware CPU clock and the AVS thermal sensor.

mod binding_test;
mod clock_test;
mod common;
mod thermal_test;
