/// Ingestion of the accident register.
///
/// Submodules:
/// - `accidents`: raw record schemas, date parsing, and normalization of a
///   bucket→records collection into `model::AccidentRecord`s.

pub mod accidents;
