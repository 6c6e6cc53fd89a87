/// Lazily compiled CSS selector, parsed once per call site.
macro_rules! selector {
    ($e: expr) => {{
        use ::scraper::Selector;
        use ::std::sync::LazyLock;
        static SELECTOR: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($e).expect("invalid selector literal"));
        &*SELECTOR
    }};
}

/// Lazily compiled regular expression, built once per call site.
macro_rules! regex {
    ($e: expr) => {{
        use ::regex::Regex;
        use ::std::sync::LazyLock;
        static PATTERN: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($e).expect("invalid regex literal"));
        &*PATTERN
    }};
}
