//! Keyword and pattern catalogues for prompt complexity analysis.
//!
//! These are compile-time constants, but the analyzer compiles the regex
//! catalogues at construction so tests can exercise the skip-on-invalid
//! behavior and category weights remain overridable through settings.

/// Keywords indicating need for deep reasoning. Weight 0.9.
pub(crate) const HIGH_REASONING_KEYWORDS: &[&str] = &[
    "analyze",
    "analyse",
    "compare",
    "contrast",
    "evaluate",
    "assess",
    "design",
    "architect",
    "debug",
    "troubleshoot",
    "optimize",
    "refactor",
    "prove",
    "derive",
    "step by step",
    "step-by-step",
    "explain why",
    "reasoning",
    "trade-off",
    "tradeoff",
    "pros and cons",
    "advantages and disadvantages",
    "critically",
    "in-depth",
    "comprehensive",
];

/// Keywords indicating moderate reasoning. Weight 0.6.
pub(crate) const MEDIUM_REASONING_KEYWORDS: &[&str] = &[
    "explain",
    "describe",
    "summarize",
    "how does",
    "how do",
    "what if",
    "implement",
    "create",
    "build",
    "develop",
    "solve",
    "calculate",
    "compute",
    "determine",
    "figure out",
    "work through",
    "walk through",
    "help me understand",
    "elaborate",
    "clarify",
];

/// Keywords typical of simple lookup questions. Weight 0.3.
pub(crate) const LOW_REASONING_KEYWORDS: &[&str] = &[
    "what is",
    "what are",
    "define",
    "list",
    "name",
    "when",
    "where",
    "who",
    "translate",
    "convert",
    "format",
    "give me",
    "tell me",
    "show me",
];

pub(crate) const KEYWORD_WEIGHT_HIGH: f64 = 0.9;
pub(crate) const KEYWORD_WEIGHT_MEDIUM: f64 = 0.6;
pub(crate) const KEYWORD_WEIGHT_LOW: f64 = 0.3;

/// Patterns for detecting code content. Weight 0.7 each.
pub(crate) const CODE_PATTERNS: &[&str] = &[
    r"```[\s\S]*?```",                              // Fenced code blocks
    r"`[^`]+`",                                     // Inline code
    r"def\s+\w+\s*\(",                              // Python function definitions
    r"function\s+\w+\s*\(",                         // JavaScript function definitions
    r"class\s+\w+[\s:{]",                           // Class definitions
    r"import\s+[\w.]+",                             // Import statements
    r"from\s+[\w.]+\s+import",                      // From imports
    r"const\s+\w+\s*=",                             // JavaScript const
    r"let\s+\w+\s*=",                               // JavaScript let
    r"var\s+\w+\s*=",                               // JavaScript var
    r"public\s+(?:static\s+)?(?:void|int|string|bool)", // C#/Java methods
    r"async\s+(?:def|function)",                    // Async functions
    r"=>\s*\{",                                     // Arrow functions
    r"SELECT\s+.+\s+FROM",                          // SQL queries
    r"CREATE\s+TABLE",                              // SQL DDL
];

/// Patterns for detecting mathematical content. Weight 0.8 each.
pub(crate) const MATH_PATTERNS: &[&str] = &[
    r"\$\$[\s\S]*?\$\$",                            // LaTeX display math
    r"\$[^$]+\$",                                   // LaTeX inline math
    r"\\frac\{",                                    // LaTeX fractions
    r"\\sum",                                       // LaTeX summation
    r"\\int",                                       // LaTeX integral
    r"\d+\s*[+\-*/^]\s*\d+",                        // Basic arithmetic expressions
    r"\d+\s*[=<>]\s*\d+",                           // Comparisons
    r"[∫∑∏√∞≤≥≠±×÷]",                               // Mathematical symbols
    r"\b(?:integral|derivative|matrix|vector|equation|formula)\b",
    r"\b(?:polynomial|factorial|logarithm|exponential|trigonometric)\b",
    r"\b(?:probability|statistics|regression|correlation)\b",
];

/// Patterns indicating multi-part questions. Weight 0.5 each.
pub(crate) const MULTIPART_PATTERNS: &[&str] = &[
    r"^\s*\d+[.)]\s+",                              // Numbered lists (1. or 1))
    r"^\s*[a-z][.)]\s+",                            // Lettered lists (a. or a))
    r"^\s*[-*•]\s+",                                // Bullet points
    r"\b(?:first|firstly|second|secondly|third|thirdly|finally)\b",
    r"\b(?:additionally|moreover|furthermore|also)\b",
    r"\b(?:and also|as well as|in addition|on top of that)\b",
    r"\?\s*\n.*\?",                                 // Questions on separate lines
    r"\?\s+(?:And|Also|What|How|Why|Can)",          // Questions in sequence
];

pub(crate) const CODE_SIGNAL_WEIGHT: f64 = 0.7;
pub(crate) const MATH_SIGNAL_WEIGHT: f64 = 0.8;
pub(crate) const MULTIPART_SIGNAL_WEIGHT: f64 = 0.5;

/// Length thresholds (characters) and the weights they map to.
pub(crate) const LENGTH_VERY_SHORT: usize = 50;
pub(crate) const LENGTH_SHORT: usize = 100;
pub(crate) const LENGTH_MEDIUM: usize = 500;
pub(crate) const LENGTH_LONG: usize = 1000;
pub(crate) const LENGTH_VERY_LONG: usize = 2000;
