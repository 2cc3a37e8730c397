//! Realistic name pools for the fixture generator and demo output.

/// Transport companies (LTL + FTL mix)
pub const CARRIER_NAMES: &[&str] = &[
    "XPO Logistics",
    "FedEx Freight",
    "Old Dominion",
    "Estes Express",
    "Saia LTL",
    "ABF Freight",
    "R+L Carriers",
    "Southeastern Freight",
    "AAA Cooper",
    "Dayton Freight",
    "Central Transport",
    "Averitt Express",
    "Pitt Ohio",
    "J.B. Hunt",
    "Schneider National",
    "Werner Enterprises",
    "Swift Transportation",
    "Knight-Swift",
    "Heartland Express",
    "Roadrunner Freight",
];

/// (city, region) pairs for synthetic routes
pub const CITIES: &[(&str, &str)] = &[
    ("New York", "New York"),
    ("Newark", "New Jersey"),
    ("Philadelphia", "Pennsylvania"),
    ("Allentown", "Pennsylvania"),
    ("Boston", "Massachusetts"),
    ("Hartford", "Connecticut"),
    ("Baltimore", "Maryland"),
    ("Richmond", "Virginia"),
    ("Charlotte", "North Carolina"),
    ("Atlanta", "Georgia"),
    ("Columbus", "Ohio"),
    ("Chicago", "Illinois"),
    ("Indianapolis", "Indiana"),
    ("Nashville", "Tennessee"),
    ("Dallas", "Texas"),
    ("Houston", "Texas"),
];

/// Vehicle type dictionary seeds: (name, pallets capacity, tonnage kg)
pub const VEHICLE_TYPES: &[(&str, i32, f64)] = &[
    ("Sprinter 1.5t", 4, 1_500.0),
    ("Box truck 3.5t", 10, 3_500.0),
    ("Rigid 10t", 20, 10_000.0),
    ("Semi-trailer 20t", 33, 20_000.0),
];
