//! # CRD Generator
//!
//! Prints the SecretEngine CustomResourceDefinition as YAML.
//!
//! ```bash
//! crdgen > config/crd/secretengine.yaml
//! ```

use anyhow::Result;

fn main() -> Result<()> {
    print!("{}", secret_engine_operator::controller::crd_yaml()?);
    Ok(())
}
