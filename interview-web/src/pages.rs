//! Server-rendered pages.

use anyhow::Result;
use minijinja::{Environment, context};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Template engine wrapper around minijinja.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn index(&self, max_upload_bytes: usize) -> Result<String> {
        let template = self.env.get_template("index.html")?;
        let rendered = template.render(context! {
            title => "Interview Assistant",
            max_upload => upload_limit_label(max_upload_bytes),
        })?;
        Ok(rendered)
    }
}

/// Human-readable size, rounded up so the label never understates the limit.
fn upload_limit_label(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;
    if bytes >= MIB {
        format!("{} MB", bytes.div_ceil(MIB))
    } else {
        format!("{} KB", bytes.div_ceil(KIB))
    }
}
