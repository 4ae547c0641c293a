use crate::entities::task;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};

/// Escape character for `LIKE` patterns. Not special in SQL string literals.
const ESCAPE_CHAR: char = '!';

/// Case folding shared by stored titles and search keywords.
///
/// Done in Rust rather than with SQL `LOWER`, which only folds ASCII on SQLite.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// A compiled, case-insensitive literal substring match on the task title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    /// Compiles a raw `keyword` query value. Blank keywords compile to nothing.
    pub fn compile(keyword: Option<&str>) -> Option<Self> {
        let keyword = keyword?.trim();
        if keyword.is_empty() {
            return None;
        }
        Some(Self {
            needle: fold(keyword),
        })
    }

    /// The folded keyword this term searches for.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// `LIKE` pattern with `%`, `_` and the escape character itself escaped.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.needle.len() + 2);
        pattern.push('%');
        for c in self.needle.chars() {
            if matches!(c, '%' | '_' | ESCAPE_CHAR) {
                pattern.push(ESCAPE_CHAR);
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }

    /// `title_search LIKE '%needle%' ESCAPE '!'`
    pub fn to_expr(&self) -> SimpleExpr {
        Expr::col((task::Entity, task::Column::TitleSearch))
            .like(LikeExpr::new(self.like_pattern()).escape(ESCAPE_CHAR))
    }

    /// In-memory equivalent of [`SearchTerm::to_expr`].
    pub fn matches(&self, title: &str) -> bool {
        fold(title).contains(&self.needle)
    }
}
