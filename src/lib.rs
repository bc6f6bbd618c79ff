//! xlsetup - Excel workbook extractor for machine setup and HMI text files
//!
//! This crate reads fixed-layout XLSX workbooks that hold machine configuration
//! values and multi-language UI texts, and renders them into the plain-text
//! configuration files consumed by the controller and the touch panel.
//!
//! Two extraction pipelines are provided:
//!
//! * **Setup extraction** produces the machine config file (`mps3.ini`), an
//!   optional HMI config file (`HMISetup.ini`), and per-language text files
//!   (`<code>.lng`) with note/description band files, all in Windows-1252.
//! * **Translation extraction** produces the language config file (`lng.ini`)
//!   and one UTF-16 touch panel file (`touchNN.ini`) per language.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::path::Path;
//! use xlsetup::ExtractorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create an extractor with the default workbook layout
//!     let extractor = ExtractorBuilder::new().build()?;
//!
//!     // Setup extraction: mps3.ini, HMISetup.ini, *.lng
//!     let input = File::open("setup.xlsx")?;
//!     extractor.extract_setup(input, Path::new("out"))?;
//!
//!     // Translation extraction: lng.ini, touchNN.ini
//!     let input = File::open("languages.xlsx")?;
//!     extractor.extract_translations(input, Path::new("out"))?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Layout
//!
//! Workbook layouts differ between document revisions. The layout is data,
//! not code: load a JSON plan and pass it to the builder.
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::path::Path;
//! use xlsetup::{ExtractionPlan, ExtractorBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let plan = ExtractionPlan::from_json_reader(File::open("plan.json")?)?;
//!     let extractor = ExtractorBuilder::new()
//!         .with_plan(plan)
//!         .with_excluded_rows(None)
//!         .build()?;
//!
//!     let input = File::open("setup.xlsx")?;
//!     extractor.extract_setup(input, Path::new("out"))?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Given the same workbook bytes and the same plan, the output files are
//! byte-for-byte reproducible.

mod builder;
mod error;
mod extract;
mod output;
mod plan;
mod record;
mod render;
mod section;
mod security;
mod source;
mod types;

// 公開API
pub use builder::{Extractor, ExtractorBuilder};
pub use error::XlSetupError;
pub use plan::{
    BlockSpec, ExtractionPlan, ExtractionRange, LanguageSpec, SetupLanguage, SetupPlan,
    StopPolicy, TranslationPlan, TRANSLATION_LANGUAGES,
};
pub use record::{Record, RecordKind, RecordSet};
pub use render::NOTE_DELIMITER;
