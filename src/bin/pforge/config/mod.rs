use anyhow::{Context, Result};

use poscar_forge::convert::{ConvertConfig, FieldNames};

use crate::cli::ConvertArgs;
use crate::io::read_text;

pub fn build_convert_config(args: &ConvertArgs) -> Result<ConvertConfig> {
    let fields = match &args.extras.fields {
        Some(path) => {
            let text = read_text(path)?;
            FieldNames::load(Some(&text))
                .with_context(|| format!("Invalid field names in '{}'", path.display()))?
        }
        None => FieldNames::load(None)?,
    };

    Ok(ConvertConfig {
        schema: args.schema.into(),
        prefix: args.prefix.clone(),
        fields,
        write_markers: args.extras.markers,
    })
}
