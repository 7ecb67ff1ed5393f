#![allow(dead_code)]

use field_detection::fill::options::FillOptions;
use field_detection::page::page_model::{ElementDescriptor, LayoutBox};

pub fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn input(input_type: Option<&str>, name: &str) -> ElementDescriptor {
    ElementDescriptor {
        input_type: input_type.map(str::to_string),
        name: Some(name.to_string()),
        ..ElementDescriptor::default()
    }
}

pub fn email_input(name: &str) -> ElementDescriptor {
    ElementDescriptor {
        id: Some(name.to_string()),
        ..input(Some("email"), name)
    }
}

pub fn hidden(el: ElementDescriptor) -> ElementDescriptor {
    ElementDescriptor {
        layout: LayoutBox::collapsed(),
        ..el
    }
}

/// Defaults with a small retry budget so exhaustion tests stay short.
pub fn quick_options(max_retries: u32) -> FillOptions {
    FillOptions {
        max_retries,
        retry_delay_ms: 200,
        ..FillOptions::default()
    }
}
