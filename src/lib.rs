//! Static recovery of call targets and call arguments from
//! [Java class files](https://docs.oracle.com/javase/specs/jvms/se17/html/jvms-4.html).
//!
//! Two passes over a decoded method body do the work:
//!
//! - [`callpoint::method_call_points`] scans forward once and classifies
//!   every call instruction (direct virtual/interface calls, and dynamically
//!   bound call sites resolved through the class's bootstrap table) into
//!   normalized [`callpoint::CallPoint`] records.
//! - [`eval::Eval`] walks backward from an instruction to reconstruct the
//!   value it pushed: constants, local-slot chains, field reads against a
//!   live receiver, and static helper calls executed through the
//!   [`eval::StaticInvoker`] seam.
//!
//! Both passes are read-only over the body and safe to run on methods that
//! reference classes the scan cannot load.

#[macro_use]
extern crate bitflags;

pub mod attribute_info;
pub mod callpoint;
pub mod code_attribute;
pub mod constant_info;
pub mod descriptor;
pub mod eval;
pub mod field_info;
pub mod jar_utils;
pub mod method_info;
pub mod types;

pub use types::*;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use binrw::BinRead;

/// Parse a class file from a path (the `.class` extension is appended).
pub fn parse_class(class_name: &str) -> Result<ClassFile, String> {
    let class_file_name = format!("{class_name}.class");
    let path = Path::new(&class_file_name);
    let file = match File::open(path) {
        Err(why) => {
            return Err(format!("Unable to open {}: {why}", path.display()));
        }
        Ok(file) => file,
    };
    parse_class_from_reader(&mut BufReader::new(file))
}

/// Parse a class file from any seekable reader.
pub fn parse_class_from_reader<T: Read + Seek>(reader: &mut T) -> Result<ClassFile, String> {
    ClassFile::read(reader).map_err(|e| format!("Failed to parse classfile: {e}"))
}
