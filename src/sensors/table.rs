//! Register map of the QCells hybrid inverter.
use super::Conversion::{
    BatteryModeLabel, Div10, Div100, InverterModeLabel, Signed16, TwowayDiv10, TwowayDiv100,
};
use super::descriptor::{
    Device, DeviceClass, Registers, SensorDescriptor as Sensor, StateClass, Unit,
};

const TOTAL_INCREASING: Option<StateClass> = Some(StateClass::TotalIncreasing);
const TOTAL: Option<StateClass> = Some(StateClass::Total);

#[rustfmt::skip]
pub static DESCRIPTORS: &[Sensor] = &[
    // Grid
    Sensor::new(Registers::Single(0), Some(Unit::Volt), DeviceClass::Voltage, "QCells Network Voltage Phase 1", Device::Inverter)
        .with_conversion(Div10),
    Sensor::new(Registers::Single(1), Some(Unit::Volt), DeviceClass::Voltage, "QCells Network Voltage Phase 2", Device::Inverter)
        .with_conversion(Div10),
    Sensor::new(Registers::Single(2), Some(Unit::Volt), DeviceClass::Voltage, "QCells Network Voltage Phase 3", Device::Inverter)
        .with_conversion(Div10),
    Sensor::new(Registers::Single(3), Some(Unit::Ampere), DeviceClass::Current, "QCells Output current Phase 1", Device::Inverter)
        .with_conversion(TwowayDiv10),
    Sensor::new(Registers::Single(4), Some(Unit::Ampere), DeviceClass::Current, "QCells Output current Phase 2", Device::Inverter)
        .with_conversion(TwowayDiv10),
    Sensor::new(Registers::Single(5), Some(Unit::Ampere), DeviceClass::Current, "QCells Output current Phase 3", Device::Inverter)
        .with_conversion(TwowayDiv10),
    Sensor::new(Registers::Single(6), Some(Unit::Watt), DeviceClass::Power, "QCells Power Now Phase 1", Device::Inverter)
        .with_conversion(Signed16),
    Sensor::new(Registers::Single(7), Some(Unit::Watt), DeviceClass::Power, "QCells Power Now Phase 2", Device::Inverter)
        .with_conversion(Signed16),
    Sensor::new(Registers::Single(8), Some(Unit::Watt), DeviceClass::Power, "QCells Power Now Phase 3", Device::Inverter)
        .with_conversion(Signed16),
    Sensor::new(Registers::Single(9), Some(Unit::Watt), DeviceClass::Power, "QCells Inverter AC Power", Device::Inverter)
        .with_conversion(Signed16),
    // Photovoltaik
    Sensor::new(Registers::Single(14), Some(Unit::Watt), DeviceClass::Power, "QCells PV1 Power", Device::Photovoltaik),
    Sensor::new(Registers::Single(15), Some(Unit::Watt), DeviceClass::Power, "QCells PV2 Power", Device::Photovoltaik),
    Sensor::new(Registers::Combined(&[14, 15]), Some(Unit::Watt), DeviceClass::Power, "QCells Total PV power", Device::Photovoltaik),
    Sensor::new(Registers::Single(16), Some(Unit::Hertz), DeviceClass::Frequency, "QCells Grid Frequency Phase 1", Device::Inverter)
        .with_conversion(Div100),
    Sensor::new(Registers::Single(17), Some(Unit::Hertz), DeviceClass::Frequency, "QCells Grid Frequency Phase 2", Device::Inverter)
        .with_conversion(Div100),
    Sensor::new(Registers::Single(18), Some(Unit::Hertz), DeviceClass::Frequency, "QCells Grid Frequency Phase 3", Device::Inverter)
        .with_conversion(Div100),
    Sensor::new(Registers::Single(19), None, DeviceClass::Enum, "QCells Inverter Operation mode", Device::Inverter)
        .with_conversion(InverterModeLabel)
        .with_state_class(None),
    Sensor::new(Registers::Single(34), Some(Unit::Watt), DeviceClass::Power, "QCells Exported Power", Device::Inverter)
        .with_conversion(Signed16),
    // Battery
    Sensor::new(Registers::Single(39), Some(Unit::Volt), DeviceClass::Voltage, "QCells Battery Voltage", Device::Battery)
        .with_conversion(Div100),
    Sensor::new(Registers::Single(40), Some(Unit::Ampere), DeviceClass::Current, "QCells Battery Current", Device::Battery)
        .with_conversion(TwowayDiv100),
    Sensor::new(Registers::Single(41), Some(Unit::Watt), DeviceClass::Power, "QCells Battery Power", Device::Battery)
        .with_conversion(Signed16),
    Sensor::new(Registers::Single(47), Some(Unit::Watt), DeviceClass::Power, "QCells Power Now", Device::Inverter)
        .with_conversion(Signed16),
    // Energy
    Sensor::new(Registers::Combined(&[68, 69]), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Total Energy", Device::Inverter)
        .with_conversions(&[Div10, Div10])
        .with_state_class(TOTAL_INCREASING),
    Sensor::new(Registers::Combined(&[74, 75]), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Total Battery Discharge Energy", Device::Battery)
        .with_conversions(&[Div10, Div10])
        .with_state_class(TOTAL_INCREASING),
    Sensor::new(Registers::Combined(&[76, 77]), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Total Battery Charge Energy", Device::Battery)
        .with_conversions(&[Div10, Div10])
        .with_state_class(TOTAL_INCREASING),
    Sensor::new(Registers::Single(78), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Today's Battery Discharge Energy", Device::Battery)
        .with_conversion(Div10)
        .with_state_class(TOTAL),
    Sensor::new(Registers::Single(79), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Today's Battery Charge Energy", Device::Battery)
        .with_conversion(Div10)
        .with_state_class(TOTAL),
    Sensor::new(Registers::Combined(&[80, 81]), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Total PV Energy", Device::Photovoltaik)
        .with_conversions(&[Div10, Div10])
        .with_state_class(TOTAL_INCREASING),
    Sensor::new(Registers::Single(82), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Today's Energy", Device::Inverter)
        .with_conversion(Div10)
        .with_state_class(TOTAL),
    Sensor::new(Registers::Combined(&[86, 87]), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Total Feed-in Energy", Device::Inverter)
        .with_conversions(&[Div100, Div100])
        .with_state_class(TOTAL),
    Sensor::new(Registers::Combined(&[88, 89]), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Total Consumption", Device::Inverter)
        .with_conversions(&[Div100, Div100])
        .with_state_class(TOTAL_INCREASING),
    Sensor::new(Registers::Single(90), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Today's Feed-in Energy", Device::Inverter)
        .with_conversion(Div100)
        .with_state_class(TOTAL),
    Sensor::new(Registers::Single(92), Some(Unit::KiloWattHour), DeviceClass::Energy, "QCells Today's Consumption", Device::Inverter)
        .with_conversion(Div100)
        .with_state_class(TOTAL),
    // Battery state
    Sensor::new(Registers::Single(103), Some(Unit::Percentage), DeviceClass::Battery, "QCells Inverter Battery Charging State", Device::Battery),
    Sensor::new(Registers::Single(105), Some(Unit::Celsius), DeviceClass::Temperature, "QCells Battery Temperature", Device::Battery),
    Sensor::new(Registers::Single(106), Some(Unit::KiloWattHour), DeviceClass::EnergyStorage, "QCells Inverter Battery Remaining Energy", Device::Battery)
        .with_conversion(Div10),
    Sensor::new(Registers::Single(168), None, DeviceClass::Enum, "QCells Battery Mode", Device::Battery)
        .with_conversion(BatteryModeLabel)
        .with_state_class(None),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{Conversions, unique_id};
    use std::collections::HashSet;

    #[test]
    fn test_table_size() {
        assert_eq!(DESCRIPTORS.len(), 37);
    }

    #[test]
    fn test_unique_ids_are_unique() {
        let ids: HashSet<String> = DESCRIPTORS.iter().map(|d| unique_id(d, "SN")).collect();
        assert_eq!(ids.len(), DESCRIPTORS.len());
    }

    #[test]
    fn test_combined_descriptors_have_matching_arity() {
        for descriptor in DESCRIPTORS {
            if let Registers::Combined(positions) = descriptor.registers {
                match descriptor.conversions {
                    Conversions::Identity => {}
                    Conversions::PerRegister(conversions) => {
                        assert_eq!(conversions.len(), positions.len(), "{}", descriptor.name)
                    }
                    Conversions::Single(_) => panic!("{} has a single conversion", descriptor.name),
                }
            }
        }
    }

    #[test]
    fn test_enum_sensors_have_no_unit_or_state_class() {
        for descriptor in DESCRIPTORS
            .iter()
            .filter(|d| d.device_class == DeviceClass::Enum)
        {
            assert_eq!(descriptor.unit, None);
            assert_eq!(descriptor.state_class, None);
        }
    }

    #[test]
    fn test_highest_register() {
        let highest = DESCRIPTORS
            .iter()
            .flat_map(|d| d.registers.positions().iter().copied())
            .max();
        assert_eq!(highest, Some(168));
    }
}
