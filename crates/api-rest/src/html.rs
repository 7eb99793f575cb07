//! Server-side rendering of the symptom page.
//!
//! The page is small enough to build with plain string formatting. Every piece of user or dataset
//! text goes through [`escape`].

use api_shared::{DiagnoseRes, MatchItem};

const DISCLAIMER: &str =
    "This tool is for information only and is not a substitute for professional medical advice.";

/// What to show on the symptom page.
#[derive(Debug, Default)]
pub struct IndexPage<'a> {
    /// The text the user submitted, echoed back into the form.
    pub user_input: &'a str,
    /// `None` before the first submission.
    pub result: Option<&'a DiagnoseRes>,
}

/// Escapes text for use in HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_index(page: &IndexPage<'_>) -> String {
    let results = page.result.map(render_result).unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>SymptomX</title>
<link rel="stylesheet" href="/static/style.css">
<script src="/static/theme.js"></script>
</head>
<body>
<header>
<h1>SymptomX</h1>
<button type="button" id="theme-toggle" aria-label="Toggle colour theme">Theme: system</button>
</header>
<main>
<form method="post" action="/">
<label for="symptoms">Describe your symptoms</label>
<input type="text" id="symptoms" name="symptoms" value="{input}" placeholder="e.g. fever, cough, sore throat" autofocus>
<button type="submit">Check</button>
</form>
{results}
<p class="disclaimer">{disclaimer}</p>
</main>
</body>
</html>
"#,
        input = escape(page.user_input),
        results = results,
        disclaimer = DISCLAIMER,
    )
}

fn render_result(res: &DiagnoseRes) -> String {
    let mut out = String::new();

    if let Some(message) = &res.message {
        out.push_str(&format!(
            "<p class=\"message\">{}</p>\n",
            escape(message)
        ));
    }

    if let Some(primary) = &res.primary {
        out.push_str("<section class=\"primary\">\n<h2>Most likely</h2>\n");
        out.push_str(&render_match(primary));
        out.push_str("</section>\n");
    }

    if !res.possible.is_empty() {
        out.push_str("<section class=\"possible\">\n<h2>Other possibilities</h2>\n");
        for item in &res.possible {
            out.push_str(&render_match(item));
        }
        out.push_str("</section>\n");
    }

    out
}

fn render_match(item: &MatchItem) -> String {
    let matched = if item.matched.is_empty() {
        String::new()
    } else {
        let phrases: Vec<String> = item.matched.iter().map(|p| escape(p)).collect();
        format!("<p class=\"matched\">Matched: {}</p>\n", phrases.join(", "))
    };

    format!(
        "<article class=\"match\">\n<h3>{disease} <span class=\"confidence\">{confidence:.1}%</span></h3>\n{matched}<p class=\"treatment\">{treatment}</p>\n</article>\n",
        disease = escape(&item.disease),
        confidence = item.confidence,
        matched = matched,
        treatment = escape(&item.treatment),
    )
}
