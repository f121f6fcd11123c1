//! Text rendering of the four views

use crate::assets::VisualAsset;
use crate::config::Config;
use crate::error::InputError;
use crate::pipeline::Prediction;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    TryModel,
    Insights,
    About,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::TryModel, Page::Insights, Page::About];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::TryModel => "Try the Model",
            Page::Insights => "Dataset Insights",
            Page::About => "About",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Page {
    type Err = String;

    /// Accepts a menu number, a page title, or a short alias
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "home" => Ok(Page::Home),
            "2" | "try the model" | "try" | "predict" => Ok(Page::TryModel),
            "3" | "dataset insights" | "insights" => Ok(Page::Insights),
            "4" | "about" => Ok(Page::About),
            other => Err(format!("Unknown page: {other}")),
        }
    }
}

pub fn render_navigation(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "📌 Navigation")?;
    writeln!(out, "Go to:")?;
    for (i, page) in Page::ALL.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, page)?;
    }
    writeln!(out, "  q. Quit")
}

pub fn render_home(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "📩 Spam Message Detection System")?;
    writeln!(out, "═══════════════════════════════════════")?;
    writeln!(out)?;
    writeln!(
        out,
        "This project demonstrates an end-to-end NLP-based Spam Detection System"
    )?;
    writeln!(out, "deployed as a production-ready application.")?;
    writeln!(out)?;
    writeln!(out, "🔍 Key Features")?;
    for feature in [
        "Text preprocessing & cleaning",
        "TF-IDF feature extraction",
        "Supervised machine learning classification",
        "Real-time message prediction",
        "Automated & cloud-ready deployment",
    ] {
        writeln!(out, "  • {feature}")?;
    }
    Ok(())
}

pub fn render_try_model(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "🧪 Try the Spam Classifier")?;
    writeln!(out, "═══════════════════════════════════════")?;
    writeln!(
        out,
        "Type a message and press Enter to predict. 'back' returns to the menu."
    )
}

pub fn render_message_prompt(out: &mut dyn Write) -> io::Result<()> {
    write!(out, "✉️  Enter your message: ")?;
    out.flush()
}

/// Result of one Predict action: the label line or the empty-input warning
pub fn render_outcome(out: &mut dyn Write, outcome: &Result<Prediction, InputError>) -> io::Result<()> {
    match outcome {
        Ok(prediction) => writeln!(out, "{prediction}"),
        Err(e) => writeln!(out, "⚠️  {e}"),
    }
}

pub fn render_insights(out: &mut dyn Write, config: &Config) -> io::Result<()> {
    writeln!(out, "📊 Dataset Insights")?;
    writeln!(out, "═══════════════════════════════════════")?;
    writeln!(out)?;
    writeln!(out, "🔹 WordCloud Analysis")?;

    let ham = VisualAsset::locate("Ham Messages WordCloud", &config.ham_wordcloud_path());
    let spam = VisualAsset::locate("Spam Messages WordCloud", &config.spam_wordcloud_path());
    writeln!(out, "  {}", ham.display_line())?;
    writeln!(out, "  {}", spam.display_line())?;

    writeln!(out)?;
    writeln!(out, "Observations")?;
    writeln!(
        out,
        "  • Spam messages commonly include promotional terms like free, win, offer"
    )?;
    writeln!(out, "  • Ham messages are more conversational and personal")
}

pub fn render_about(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "ℹ️  About This Project")?;
    writeln!(out, "═══════════════════════════════════════")?;
    writeln!(out)?;
    writeln!(out, "Spam Message Detection System v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out)?;
    let sections: [(&str, &[&str]); 3] = [
        (
            "Technologies Used",
            &[
                "Rust",
                "TF-IDF text vectorization",
                "Naive Bayes / linear classifiers",
                "Natural Language Processing (NLP)",
            ],
        ),
        (
            "Pipeline",
            &[
                "Text preprocessing",
                "TF-IDF vectorization",
                "Supervised classification",
                "Model serialization",
                "Automated deployment",
            ],
        ),
        (
            "Key Focus",
            &["Reusability", "Robust error handling", "Cloud compatibility"],
        ),
    ];
    for (heading, items) in sections {
        writeln!(out, "{heading}")?;
        for item in items {
            writeln!(out, "  • {item}")?;
        }
    }
    Ok(())
}

/// Renders a page that needs no input
pub fn render_page(out: &mut dyn Write, page: Page, config: &Config) -> io::Result<()> {
    match page {
        Page::Home => render_home(out),
        Page::TryModel => render_try_model(out),
        Page::Insights => render_insights(out, config),
        Page::About => render_about(out),
    }
}
