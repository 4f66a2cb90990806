//! HTML print documents with inline base64 PNG images.
//!
//! One image gets a page of its own, centered in the viewport. Several
//! images are stacked with a page break before each one. With `auto_print`
//! the document asks the browser to print on load and closes itself
//! afterwards; without it the document is only print-ready.

const AUTO_PRINT_ATTR: &str = r#" onload="window.print(); window.onafterprint = window.close();""#;

const SINGLE_STYLE: &str = r#"
        body {
            margin: 0;
            padding: 0;
            display: flex;
            justify-content: center;
            align-items: center;
            height: 100vh;
            width: 100vw;
            page-break-before: always;
        }
        img {
            max-width: 8.5in;
            max-height: 9in;
            margin-top: 1in;
            margin-bottom: 1in;
            display: block;
        }"#;

const MULTI_STYLE: &str = r#"
        body {
            margin: 0;
            padding: 0;
        }
        img {
            max-width: 8.5in;
            max-height: 9in;
            margin-top: 1in;
            margin-bottom: 1in;
            display: block;
            page-break-before: always;
        }"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    images: Vec<String>,
    auto_print: bool,
}

impl PrintDocument {
    /// `images` are base64-encoded PNG payloads, without the data URI prefix.
    pub fn new(images: Vec<String>) -> Self {
        PrintDocument { images, auto_print: true }
    }

    pub fn auto_print(mut self, enabled: bool) -> Self {
        self.auto_print = enabled;
        self
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn render(&self) -> String {
        let style = if self.images.len() == 1 { SINGLE_STYLE } else { MULTI_STYLE };
        let onload = if self.auto_print { AUTO_PRINT_ATTR } else { "" };
        let tags = self
            .images
            .iter()
            .map(|b64| format!(r#"    <img src="data:image/png;base64,{}" />"#, b64))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "<html>\n<head>\n    <style>{}\n    </style>\n</head>\n<body{}>\n{}\n</body>\n</html>\n",
            style, onload, tags
        )
    }
}
