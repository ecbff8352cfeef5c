use super::push_caller_text;
use crate::config::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::fragment::FragmentList;

/// Paging state. Direct `skip`/`take` and `page` replace each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Paging {
    #[default]
    None,
    Direct {
        skip: Option<u64>,
        take: Option<u64>,
    },
    Page {
        number: u64,
        size: u64,
    },
}

impl Paging {
    /// Resolved `(skip, take)`.
    pub fn window(&self) -> Option<(u64, Option<u64>)> {
        match *self {
            Paging::None => None,
            Paging::Direct { skip, take } => Some((skip.unwrap_or(0), take)),
            Paging::Page { number, size } => {
                Some((number.saturating_sub(1).saturating_mul(size), Some(size)))
            }
        }
    }
}

fn non_negative(what: &str, n: i64) -> SqlResult<u64> {
    u64::try_from(n).map_err(|_| SqlError::invalid_argument(format!("{what} must be >= 0, got {n}")))
}

/// Statement epilogue: paging followed by free-form trailing text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndClause {
    paging: Paging,
    tail: FragmentList,
}

impl EndClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip `n` rows. Discards an earlier `page`.
    pub fn skip(&mut self, n: i64) -> SqlResult<()> {
        let n = non_negative("skip", n)?;
        self.paging = match self.paging {
            Paging::Direct { take, .. } => Paging::Direct {
                skip: Some(n),
                take,
            },
            _ => Paging::Direct {
                skip: Some(n),
                take: None,
            },
        };
        Ok(())
    }

    /// Return at most `n` rows. Discards an earlier `page`.
    pub fn take(&mut self, n: i64) -> SqlResult<()> {
        let n = non_negative("take", n)?;
        self.paging = match self.paging {
            Paging::Direct { skip, .. } => Paging::Direct {
                skip,
                take: Some(n),
            },
            _ => Paging::Direct {
                skip: None,
                take: Some(n),
            },
        };
        Ok(())
    }

    /// 1-based page of `size` rows. Discards earlier `skip`/`take`.
    pub fn page(&mut self, number: i64, size: i64) -> SqlResult<()> {
        if number < 1 {
            return Err(SqlError::invalid_argument(format!(
                "page must be >= 1, got {number}"
            )));
        }
        if size < 1 {
            return Err(SqlError::invalid_argument(format!(
                "page size must be >= 1, got {size}"
            )));
        }
        let (number, size) = (number as u64, size as u64);
        if (number - 1).checked_mul(size).is_none() {
            return Err(SqlError::invalid_argument(format!(
                "page {number} of size {size} overflows the row offset"
            )));
        }
        self.paging = Paging::Page { number, size };
        Ok(())
    }

    pub fn paging(&self) -> Paging {
        self.paging
    }

    pub fn has_paging(&self) -> bool {
        self.paging != Paging::None
    }

    /// Append free-form text after the paging fragment.
    pub fn append_sql(&mut self, text: &str, raw: bool) {
        push_caller_text(&mut self.tail, "END", text, raw);
    }

    pub(crate) fn clear_paging(&mut self) {
        self.paging = Paging::None;
    }

    pub fn clear(&mut self) {
        self.paging = Paging::None;
        self.tail.clear();
    }

    pub fn is_empty(&self) -> bool {
        !self.has_paging() && self.tail.is_empty()
    }

    pub(crate) fn write_to(&self, dialect: &Dialect, out: &mut FragmentList) {
        let mut parts: Vec<String> = Vec::new();
        if let Some((skip, take)) = self.paging.window() {
            if dialect.supports_offset_fetch {
                parts.push(format!("OFFSET {skip} ROWS"));
                if let Some(take) = take {
                    parts.push(format!("FETCH NEXT {take} ROWS ONLY"));
                }
            } else {
                if let Some(take) = take {
                    parts.push(format!("LIMIT {take}"));
                }
                if skip > 0 {
                    parts.push(format!("OFFSET {skip}"));
                }
            }
        }
        out.push_sql(&parts.join(" "));
        if !self.tail.is_empty() {
            if !parts.is_empty() {
                out.push_sql(" ");
            }
            out.append(self.tail.clone());
        }
    }
}
