//! # sovran-varvec
//!
//! An append-only, order-preserving heterogeneous vector.
//!
//! `sovran-varvec` stores values of several declared types in one container.
//! Each value goes into the bucket of the declared type it matches most
//! closely, the way an overloaded call picks the closest parameter type, and
//! iteration replays every value in the order it was inserted, handing each
//! one to a visitor with its declared type.
//!
//! ## Key Features
//!
//! - **Closest-match routing**: exact types beat promotions, promotions beat
//!   standard conversions, standard conversions beat user-defined ones
//! - **Global order**: values come back in insertion order across all buckets
//! - **Closed dispatch**: visitors are matched against a fixed, compile-time list of types
//! - **No duplication**: the global order is rebuilt from per-type buckets, not stored twice
//! - **Borrow-checked iteration**: the container cannot grow while a cursor is alive
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_varvec::{VarVec, VarVecError, Visit};
//!
//! struct Printer;
//!
//! impl Visit<i32> for Printer {
//!     type Output = String;
//!     fn visit(&mut self, value: &i32) -> String {
//!         value.to_string()
//!     }
//! }
//!
//! impl Visit<String> for Printer {
//!     type Output = String;
//!     fn visit(&mut self, value: &String) -> String {
//!         value.clone()
//!     }
//! }
//!
//! impl Visit<f64> for Printer {
//!     type Output = String;
//!     fn visit(&mut self, value: &f64) -> String {
//!         format!("{:.1}", value)
//!     }
//! }
//!
//! fn main() -> Result<(), VarVecError> {
//!     // Declare the types the vector accepts
//!     let mut vec = VarVec::<(i32, String, f64)>::new();
//!
//!     vec.insert(2i16)?;
//!     vec.insert(42)?;
//!     vec.insert("Hello world!")?;
//!     vec.insert(42.5)?;
//!     vec.insert(42)?;
//!     vec.insert(42.5)?;
//!
//!     let printed = vec.visit_all(&mut Printer);
//!     assert_eq!(printed, vec!["2", "42", "Hello world!", "42.5", "42", "42.5"]);
//!
//!     // Grouped by declared type instead
//!     let grouped = vec.visit_by_slot(&mut Printer);
//!     assert_eq!(grouped, vec!["2", "42", "42", "Hello world!", "42.5", "42.5"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Walking with a Cursor
//!
//! ```rust
//! use sovran_varvec::{VarVec, VarVecError};
//!
//! fn main() -> Result<(), VarVecError> {
//!     let mut vec = VarVec::<(i32, String)>::new();
//!     vec.insert(42)?;
//!     vec.insert("hello")?;
//!
//!     let mut cursor = vec.begin();
//!     while cursor != vec.end() {
//!         let entry = cursor.entry()?;
//!         println!("#{} is a {}", entry.seq(), entry.type_name());
//!         cursor.advance()?;
//!     }
//!
//!     // The end cursor points at nothing
//!     match vec.end().entry() {
//!         Err(VarVecError::IteratorOutOfBounds { position, len }) => {
//!             assert_eq!((position, len), (2, 2));
//!         }
//!         other => panic!("unexpected {:?}", other),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Declaring Your Own Types
//!
//! ```rust
//! use sovran_varvec::{ConversionTable, Element, VarVec, VarVecError};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Celsius(f64);
//!
//! impl From<f32> for Celsius {
//!     fn from(value: f32) -> Self {
//!         Celsius(f64::from(value))
//!     }
//! }
//!
//! impl Element for Celsius {
//!     fn conversions(table: &mut ConversionTable<Self>) {
//!         table.user_defined::<f32>();
//!     }
//! }
//!
//! fn main() -> Result<(), VarVecError> {
//!     let mut vec = VarVec::<(Celsius, f64)>::new();
//!
//!     // f32 -> f64 is a promotion, which beats the user-defined conversion
//!     assert_eq!(vec.insert(21.5f32)?, 0);
//!     assert_eq!(vec.bucket::<f64>().map(|b| b.len()), Some(1));
//!
//!     vec.insert(Celsius(-4.0))?;
//!     assert_eq!(vec.bucket::<Celsius>().map(|b| b.len()), Some(1));
//!
//!     // Nothing accepts a bool
//!     match vec.insert(true) {
//!         Err(VarVecError::NoApplicableBucket { type_name }) => assert_eq!(type_name, "bool"),
//!         other => panic!("unexpected {:?}", other),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod bucket;
mod conversion;
mod cursor;
mod error;
mod resolve;
mod schema;
mod slot;
mod varvec;
mod visit;

pub use bucket::{Bucket, Iter as BucketIter};
pub use conversion::{ConversionTable, Element, Rank};
pub use cursor::{Cursor, Entry, Iter};
pub use error::VarVecError;
pub use resolve::{resolve, Candidate, Resolution};
pub use schema::Schema;
pub use slot::{AnySlot, Slot};
pub use varvec::VarVec;
pub use visit::{Dispatch, Visit};
