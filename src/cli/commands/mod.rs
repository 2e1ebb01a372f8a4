pub mod entries;
pub mod import;
pub mod registry;

#[cfg(test)]
mod entries_test;
#[cfg(test)]
mod import_test;
#[cfg(test)]
mod registry_test;
