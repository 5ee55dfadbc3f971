use std::io::{self, Write};

use manual_tags::DeviceMapping;

use super::format::truncate;

const MAX_NAME_WIDTH: usize = 50;

pub fn run<W: Write>(mapping: &DeviceMapping, out: &mut W) -> io::Result<()> {
    let name_width = mapping
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_NAME_WIDTH);

    for (name, device_id) in mapping.iter() {
        writeln!(
            out,
            "  {:<width$}  {}",
            truncate(name, name_width),
            device_id,
            width = name_width
        )?;
    }

    writeln!(out, "\n{} mapped files", mapping.len())
}
