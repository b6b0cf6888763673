//! List-view verification: keyword filtering, page clamping and sort order

use std::cmp::Ordering;

use tmat_common::{ListQuery, SortOrder};

use super::{ensure, AssertionFailure, Check, OutcomeEvaluator};
use crate::browser::ElementRef;
use crate::config::ListRules;
use crate::driver::ListPage;

impl OutcomeEvaluator<'_> {
    /// Check the list page against the query that produced it.
    ///
    /// Checks run in a fixed order and the first failure decides the verdict.
    pub async fn verify_list_query(&self, query: &ListQuery, page: &ListPage) -> Check {
        let rules = &self.config.list;
        let rows = &page.rows;

        match query.keyword() {
            None => ensure(!rows.is_empty(), || "no rows listed without a keyword".to_string())?,
            Some(keyword) if keyword == rules.positive_keyword => {
                let titles = self.column(rows, rules.title_column).await?;
                titles_contain(&titles, keyword)?;
            }
            Some(keyword) if keyword == rules.negative_keyword => ensure(rows.is_empty(), || {
                format!("keyword '{}' listed {} row(s), expected none", keyword, rows.len())
            })?,
            Some(_) => {}
        }

        let url = self.browser.current_url().await?;
        let params = QueryParams::parse(&url)?;

        let expected_page = clamp_page(query.page, rules.max_page);
        params.expect("page", &expected_page.to_string())?;

        let order = query.sort_order();
        match query.sort_field() {
            Some(field) => {
                params.expect("sortField", field.as_str())?;
                let values = self.column(rows, rules.column_for(field)).await?;
                check_order(&values, order, field.as_str())?;
            }
            None => params.expect("sortField", &rules.default_sort_field)?,
        }

        match order {
            Some(order) => {
                let titles = self.column(rows, rules.title_column).await?;
                check_order(&titles, Some(order), "title")?;
            }
            None => params.expect("sortOrder", &rules.default_sort_order)?,
        }

        Ok(format!("{} row(s) on page {}", rows.len(), expected_page))
    }

    /// Text of the cell at `column` for every row
    async fn column(&self, rows: &[ElementRef], column: usize) -> Result<Vec<String>, AssertionFailure> {
        let cell = ListRules::cell(column);
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let element = self.browser.find_child(row, &cell).await?;
            values.push(self.browser.text(&element).await?);
        }
        Ok(values)
    }
}

/// Page the application must show for a requested page
pub fn clamp_page(requested: i64, max_page: i64) -> i64 {
    if requested < 1 || requested > max_page {
        1
    } else {
        requested
    }
}

/// Ordinal comparison of UTF-16 code units after upper-casing each character.
///
/// Characters whose upper case expands (`ß` to `SS`) are kept as they are.
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    upper_units(a).cmp(upper_units(b))
}

fn simple_uppercase(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

fn upper_units(s: &str) -> impl Iterator<Item = u16> + '_ {
    s.chars().map(simple_uppercase).flat_map(|c| {
        let mut buf = [0u16; 2];
        let len = c.encode_utf16(&mut buf).len();
        buf.into_iter().take(len)
    })
}

/// The sequence a correctly sorted column must equal.
///
/// Descending is the stable ascending sort reversed, not a separate
/// descending sort: values that compare equal end up in reverse order.
/// Without a known order the column is expected as observed.
pub fn expected_order(values: &[String], order: Option<SortOrder>) -> Vec<String> {
    let mut sorted = values.to_vec();
    match order {
        Some(SortOrder::Asc) => sorted.sort_by(|a, b| compare_ignore_case(a, b)),
        Some(SortOrder::Desc) => {
            sorted.sort_by(|a, b| compare_ignore_case(a, b));
            sorted.reverse();
        }
        None => {}
    }
    sorted
}

fn check_order(values: &[String], order: Option<SortOrder>, column: &str) -> Result<(), AssertionFailure> {
    let expected = expected_order(values, order);
    ensure(values == expected.as_slice(), || {
        format!(
            "{} column not in {} order: got {:?}, expected {:?}",
            column,
            order.map(|o| o.as_str()).unwrap_or("requested"),
            values,
            expected
        )
    })
}

fn titles_contain(titles: &[String], phrase: &str) -> Result<(), AssertionFailure> {
    let needle = phrase.to_lowercase();
    match titles.iter().find(|t| !t.to_lowercase().contains(&needle)) {
        Some(title) => Err(AssertionFailure(format!(
            "row titled '{}' does not contain '{}'",
            title, phrase
        ))),
        None => Ok(()),
    }
}

/// Decoded query parameters of the page URL
#[derive(Debug, Clone)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn parse(raw: &str) -> Result<Self, AssertionFailure> {
        let url = url::Url::parse(raw)
            .map_err(|e| AssertionFailure(format!("unparseable page url '{}': {}", raw, e)))?;
        Ok(Self(url.query_pairs().into_owned().collect()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn expect(&self, name: &str, expected: &str) -> Result<(), AssertionFailure> {
        let actual = self.get(name);
        ensure(actual == Some(expected), || {
            format!("url {}={:?}, expected {}", name, actual, expected)
        })
    }
}
