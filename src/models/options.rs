//! Fixed option sets offered by the survey form's selection controls.

pub const JOBS: &[&str] = &[
    "Teacher",
    "Lawyer",
    "Doctor",
    "Driver",
    "Engineer",
    "Nurse",
    "Military",
    "Police",
    "Farmer",
    "Businessman",
    "Student",
    "Other",
];

pub const SECTORS: &[&str] = &["Government", "Private", "Other"];

pub const GENDERS: &[&str] = &["Male", "Female"];

pub const CIVIL_STATES: &[&str] = &["Married", "Unmarried"];

pub const VEHICLE_TYPES: &[&str] = &[
    "Car",
    "Van",
    "Bike",
    "Threewheel",
    "SUV",
    "Lorry",
    "Cab",
    "Bus",
    "Other",
];

pub const VEHICLE_BRANDS: &[&str] = &[
    "Toyota",
    "Mitsubishi",
    "Bajaj",
    "Yamaha",
    "BMW",
    "Audi",
    "Suzuki",
    "Kia",
    "Hyundai",
    "Micro",
    "perodua",
    "Nissan",
    "Honda",
    "Tesla",
    "MG",
    "Piagio",
    "Dihatsu",
    "Tata",
    "Ford",
    "Chevrolet",
    "Volvo",
    "Benz",
    "Other",
];

pub const FUEL_TYPES: &[&str] = &["Petrol", "Diesel", "EV"];
