//! Canonical column names.
//!
//! All three sources converge on these names before the star-schema merge.

pub const ID: &str = "id";

pub const COUNTRY: &str = "Country";
pub const CODE: &str = "Code";
pub const YEAR: &str = "Year";
pub const SEX: &str = "Sex";
pub const AGE: &str = "Age";
pub const AGE_CATEGORY: &str = "Age_category";
pub const GENERATION: &str = "Generation";
pub const CENTURY: &str = "Century";
pub const DECADE: &str = "Decade";

pub const GDP: &str = "GDP";
pub const POPULATION: &str = "Population";
pub const SUICIDES_NUMBER: &str = "Suicides_number";
pub const NUMBER_OF_INTERNET_USERS: &str = "Number_of_internet_users";

pub const NUMBER_OF_PEOPLE: &str = "Number_of_people";
pub const TOTAL_POPULATION: &str = "Total_population";
pub const PERCENTAGE_OF_POPULATION: &str = "Percentage_of_population";
pub const TOTAL_NUMBER_OF_INTERNET_USERS: &str = "Total_number_of_internet_users";

/// Raw GDP headers.
pub mod gdp_raw {
    /// The source header carries a trailing space; matching is done on the trimmed name.
    pub const COUNTRY: &str = "Country";
}

/// Raw internet-usage headers.
pub mod internet_raw {
    pub const ENTITY: &str = "Entity";
    pub const CODE: &str = "Code";
    pub const YEAR: &str = "Year";
    pub const USERS: &str = "Number of internet users (OWID based on WB & UN)";
}

/// Raw suicide-statistics headers.
pub mod suicide_raw {
    pub const COUNTRY: &str = "country";
    pub const YEAR: &str = "year";
    pub const SEX: &str = "sex";
    pub const AGE: &str = "age";
    pub const SUICIDES_NO: &str = "suicides_no";
    pub const POPULATION: &str = "population";
    pub const GENERATION: &str = "generation";

    /// Renamed before capitalization so the result reads `Suicides_number`.
    pub const SUICIDES_NUMBER: &str = "suicides_number";

    /// Composite key or out-of-scope derived metrics.
    pub const DROPPED: [&str; 5] = [
        "country-year",
        " gdp_for_year ($) ",
        "gdp_per_capita ($)",
        "HDI for year",
        "suicides/100k pop",
    ];

    /// Columns that must be present for the normalizer to run.
    pub const REQUIRED: [&str; 7] = [COUNTRY, YEAR, SEX, AGE, SUICIDES_NO, POPULATION, GENERATION];
}

/// Columns the builder needs from each normalized table.
pub mod normalized {
    use super::{
        AGE, COUNTRY, GDP, GENERATION, NUMBER_OF_INTERNET_USERS, POPULATION, SEX,
        SUICIDES_NUMBER, YEAR,
    };

    pub const GDP_REQUIRED: [&str; 3] = [COUNTRY, YEAR, GDP];
    pub const INTERNET_REQUIRED: [&str; 3] = [COUNTRY, YEAR, NUMBER_OF_INTERNET_USERS];
    pub const SUICIDE_REQUIRED: [&str; 7] = [
        COUNTRY,
        YEAR,
        SEX,
        AGE,
        GENERATION,
        SUICIDES_NUMBER,
        POPULATION,
    ];
}
