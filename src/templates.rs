use std::path::Path;
use tera::Tera;

use crate::error::Result;

const BUILTIN: [(&str, &str); 8] = [
    ("base.html", include_str!("../templates/base.html")),
    ("cards.html", include_str!("../templates/cards.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("article.html", include_str!("../templates/article.html")),
    ("listing.html", include_str!("../templates/listing.html")),
    ("privacy.html", include_str!("../templates/privacy.html")),
    ("terms.html", include_str!("../templates/terms.html")),
    ("not_found.html", include_str!("../templates/not_found.html")),
];

pub const STYLESHEET: &str = include_str!("../static/site.css");

/// Built-in templates, with any same-named file under `dir` taking precedence.
pub fn load(dir: Option<&Path>) -> Result<Tera> {
    let mut tera = match dir {
        Some(dir) => {
            let glob = format!("{}/**/*.html", dir.display());
            tracing::info!("loading templates from {}", glob);
            Tera::parse(&glob)?
        }
        None => Tera::default(),
    };

    let overridden: Vec<String> = tera.get_template_names().map(String::from).collect();
    let missing: Vec<(&str, &str)> = BUILTIN
        .iter()
        .filter(|(name, _)| !overridden.iter().any(|have| have.as_str() == *name))
        .copied()
        .collect();

    tera.add_raw_templates(missing)?;
    Ok(tera)
}
