//! Applying create and update commands to machines

use crate::contracts::{CreateMachineCommand, Machine, UpdateMachineCommand};
use crate::maybe::Maybe;

impl Machine {
    /// Build a new machine with the given id from a create command
    pub fn from_create(id: impl Into<String>, create: CreateMachineCommand) -> Self {
        Self {
            id: id.into(),
            machine_name: create.machine_name,
            manufacturing_year: create.manufacturing_year,
            serial_number: create.serial_number,
            fabric_serial_number: create.fabric_serial_number,
            internal_series_name: create.internal_series_name,
            manufacturer_name: create.manufacturer_name,
            place_of_manufacturing: create.place_of_manufacturing,
        }
    }

    /// Overwrite every data field from `create`, keeping the id
    pub fn apply_create(&mut self, create: CreateMachineCommand) {
        let id = std::mem::take(&mut self.id);
        *self = Self::from_create(id, create);
    }

    /// Apply the fields present in `update`; absent ones are ignored
    pub fn patch(&mut self, update: &UpdateMachineCommand) {
        if let Maybe::Present(name) = &update.machine_name {
            self.machine_name = name.clone();
        }
        if let Maybe::Present(year) = update.manufacturing_year {
            self.manufacturing_year = year;
        }
        if let Maybe::Present(serial) = &update.serial_number {
            self.serial_number = serial.clone();
        }
        if let Maybe::Present(manufacturer) = &update.manufacturer_name {
            self.manufacturer_name = manufacturer.clone();
        }
        if let Maybe::Present(fabric_serial) = &update.fabric_serial_number {
            self.fabric_serial_number = Some(fabric_serial.clone());
        }
        if let Maybe::Present(series) = &update.internal_series_name {
            self.internal_series_name = Some(series.clone());
        }
        if let Maybe::Present(place) = &update.place_of_manufacturing {
            self.place_of_manufacturing = Some(place.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn create() -> CreateMachineCommand {
        CreateMachineCommand {
            machine_name: "xyz".to_string(),
            manufacturing_year: Utc.with_ymd_and_hms(2029, 1, 20, 0, 0, 0).unwrap(),
            serial_number: "01234".to_string(),
            fabric_serial_number: Some("1234ab".to_string()),
            internal_series_name: Some("internal1234".to_string()),
            manufacturer_name: "Microsoft".to_string(),
            place_of_manufacturing: Some("Redmond".to_string()),
        }
    }

    #[test]
    fn test_from_create_maps_all_fields() {
        let machine = Machine::from_create("id-1", create());

        assert_eq!(machine.id, "id-1");
        assert_eq!(machine.machine_name, "xyz");
        assert_eq!(machine.serial_number, "01234");
        assert_eq!(machine.fabric_serial_number.as_deref(), Some("1234ab"));
        assert_eq!(machine.internal_series_name.as_deref(), Some("internal1234"));
        assert_eq!(machine.manufacturer_name, "Microsoft");
        assert_eq!(machine.place_of_manufacturing.as_deref(), Some("Redmond"));
    }

    #[test]
    fn test_apply_create_keeps_id() {
        let mut machine = Machine::from_create("keep-me", create());
        let mut other = create();
        other.machine_name = "renamed".to_string();
        other.place_of_manufacturing = None;

        machine.apply_create(other);
        assert_eq!(machine.id, "keep-me");
        assert_eq!(machine.machine_name, "renamed");
        assert_eq!(machine.place_of_manufacturing, None);
    }

    #[test]
    fn test_patch_ignores_absent_fields() {
        let mut machine = Machine::from_create("id-1", create());
        let before = machine.clone();

        machine.patch(&UpdateMachineCommand::new("id-1"));
        assert_eq!(machine, before);

        let mut update = UpdateMachineCommand::new("id-1");
        update.machine_name = Maybe::present("Test machine1".to_string());
        update.place_of_manufacturing = Maybe::present("Aachen".to_string());
        machine.patch(&update);

        assert_eq!(machine.machine_name, "Test machine1");
        assert_eq!(machine.place_of_manufacturing.as_deref(), Some("Aachen"));
        assert_eq!(machine.serial_number, before.serial_number);
        assert_eq!(machine.manufacturing_year, before.manufacturing_year);
    }

    #[test]
    fn test_patch_applies_every_present_field() {
        let mut machine = Machine::from_create("id-1", create());
        machine.fabric_serial_number = None;

        let year = Utc.with_ymd_and_hms(2021, 4, 8, 20, 33, 50).unwrap();
        let update = UpdateMachineCommand {
            id: "id-1".to_string(),
            machine_name: Maybe::present("Test machine1".to_string()),
            manufacturing_year: Maybe::present(year),
            serial_number: Maybe::present("123-456".to_string()),
            fabric_serial_number: Maybe::present("12345".to_string()),
            internal_series_name: Maybe::present("Contura 4711".to_string()),
            manufacturer_name: Maybe::present("Contoso".to_string()),
            place_of_manufacturing: Maybe::present("Aachen".to_string()),
        };
        machine.patch(&update);

        assert_eq!(machine.id, "id-1");
        assert_eq!(machine.machine_name, "Test machine1");
        assert_eq!(machine.manufacturing_year, year);
        assert_eq!(machine.serial_number, "123-456");
        assert_eq!(machine.fabric_serial_number.as_deref(), Some("12345"));
        assert_eq!(machine.internal_series_name.as_deref(), Some("Contura 4711"));
        assert_eq!(machine.manufacturer_name, "Contoso");
        assert_eq!(machine.place_of_manufacturing.as_deref(), Some("Aachen"));
    }
}
