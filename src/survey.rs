use crate::error::Result;
use crate::responses::ResponseSet;
use dialoguer::{theme::ColorfulTheme, Select};
use once_cell::sync::Lazy;
use tracing::debug;

static THEME: Lazy<ColorfulTheme> = Lazy::new(ColorfulTheme::default);

/// A selectable option within a survey question.
#[derive(Debug, Clone, Copy)]
pub struct Choice {
    /// Token stored in the response set (lowercase)
    pub token: &'static str,
    /// Human-readable menu label
    pub label: &'static str,
}

/// A single survey question mapping to one preference key.
#[derive(Debug, Clone, Copy)]
pub struct Question {
    /// Response set key (lowercase snake_case)
    pub key: &'static str,
    /// Prompt shown to the user
    pub prompt: &'static str,
    /// Fixed options for this question
    pub choices: &'static [Choice],
}

/// Template variant the survey targets.
///
/// Each variant carries its own question catalog; the JavaScript
/// variant additionally asks for the runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyKind {
    /// Python instruction template
    Python,
    /// JavaScript/TypeScript instruction template
    Javascript,
}

const PYTHON_QUESTIONS: &[Question] = &[
    Question {
        key: "package_manager",
        prompt: "Package Management",
        choices: &[
            Choice { token: "uv", label: "UV (modern, fast Python package installer)" },
            Choice { token: "pip", label: "pip (traditional Python package installer)" },
        ],
    },
    Question {
        key: "testing_framework",
        prompt: "Testing Framework",
        choices: &[
            Choice { token: "pytest", label: "pytest (popular third-party testing framework)" },
            Choice { token: "unittest", label: "unittest (built-in Python testing framework)" },
        ],
    },
    Question {
        key: "code_formatter",
        prompt: "Code Formatting",
        choices: &[
            Choice { token: "black", label: "black (opinionated code formatter)" },
            Choice { token: "autopep8", label: "autopep8 (PEP 8 compliant formatter)" },
            Choice { token: "ruff_format", label: "ruff format (fast Rust-based formatter)" },
        ],
    },
    Question {
        key: "linter",
        prompt: "Linting",
        choices: &[
            Choice { token: "ruff", label: "ruff (fast Rust-based linter)" },
            Choice { token: "flake8", label: "flake8 (traditional Python linter)" },
            Choice { token: "pylint", label: "pylint (comprehensive Python linter)" },
        ],
    },
    Question {
        key: "type_checker",
        prompt: "Type Checking",
        choices: &[
            Choice { token: "mypy", label: "mypy (static type checker)" },
            Choice { token: "pyright", label: "pyright (Microsoft's type checker)" },
            Choice { token: "none", label: "None (no type checking)" },
        ],
    },
];

const JAVASCRIPT_QUESTIONS: &[Question] = &[
    Question {
        key: "runtime_environment",
        prompt: "Runtime Environment",
        choices: &[
            Choice { token: "node", label: "Node.js (standard JavaScript runtime)" },
            Choice { token: "deno", label: "Deno (secure TypeScript-first runtime)" },
            Choice { token: "bun", label: "Bun (fast all-in-one runtime)" },
        ],
    },
    Question {
        key: "package_manager",
        prompt: "Package Management",
        choices: &[
            Choice { token: "npm", label: "npm (default Node.js package manager)" },
            Choice { token: "pnpm", label: "pnpm (fast, disk-efficient package manager)" },
            Choice { token: "yarn", label: "Yarn (alternative package manager)" },
            Choice { token: "bun", label: "bun (built-in Bun package manager)" },
        ],
    },
    Question {
        key: "testing_framework",
        prompt: "Testing Framework",
        choices: &[
            Choice { token: "jest", label: "Jest (widely used testing framework)" },
            Choice { token: "vitest", label: "Vitest (Vite-native testing framework)" },
            Choice { token: "mocha", label: "Mocha (flexible testing framework)" },
        ],
    },
    Question {
        key: "code_formatter",
        prompt: "Code Formatting",
        choices: &[
            Choice { token: "prettier", label: "Prettier (opinionated code formatter)" },
            Choice { token: "biome", label: "Biome (fast Rust-based formatter)" },
        ],
    },
    Question {
        key: "linter",
        prompt: "Linting",
        choices: &[
            Choice { token: "eslint", label: "ESLint (standard JavaScript linter)" },
            Choice { token: "biome", label: "Biome (fast Rust-based linter)" },
            Choice { token: "oxlint", label: "Oxlint (fast Rust-based linter)" },
        ],
    },
    Question {
        key: "type_checker",
        prompt: "Type Checking",
        choices: &[
            Choice { token: "typescript", label: "TypeScript (static type checking)" },
            Choice { token: "none", label: "None (plain JavaScript)" },
        ],
    },
];

impl SurveyKind {
    /// Returns the question catalog for this variant.
    #[must_use]
    pub const fn questions(self) -> &'static [Question] {
        match self {
            Self::Python => PYTHON_QUESTIONS,
            Self::Javascript => JAVASCRIPT_QUESTIONS,
        }
    }

    /// Returns the banner printed before the survey starts.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Python => "Python Copilot Instructions Customization",
            Self::Javascript => "JavaScript Copilot Instructions Customization",
        }
    }

    /// Returns the default template path for this variant.
    #[must_use]
    pub const fn default_template(self) -> &'static str {
        match self {
            Self::Python => "templates/python.md",
            Self::Javascript => "templates/javascript.md",
        }
    }
}

/// Runs the interactive survey and collects a response set.
///
/// One select menu per question; the first option is the default.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails or is aborted.
pub fn run_survey(kind: SurveyKind) -> Result<ResponseSet> {
    let title = kind.title();
    println!("{title}");
    println!("{}", "=".repeat(title.len() + 4));
    println!();

    let questions = kind.questions();
    let mut selections = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let labels: Vec<&str> = question.choices.iter().map(|c| c.label).collect();

        let picked = Select::with_theme(&*THEME)
            .with_prompt(format!("{}. {}", i + 1, question.prompt))
            .items(&labels)
            .default(0)
            .interact()?;

        debug!(
            "Selected '{}' for {}",
            question.choices[picked].token, question.key
        );
        selections.push(picked);
    }

    Ok(apply_selections(questions, &selections))
}

/// Builds a response set from question catalog indices.
///
/// Out-of-range indices fall back to the first choice; the interactive
/// path never produces them.
#[must_use]
pub fn apply_selections(questions: &[Question], selections: &[usize]) -> ResponseSet {
    let mut responses = ResponseSet::new();

    for (question, &picked) in questions.iter().zip(selections) {
        let choice = question.choices.get(picked).unwrap_or(&question.choices[0]);
        responses.insert(question.key, choice.token);
    }

    responses
}
