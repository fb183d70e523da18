//! Ranking stage: stable descending sort of the harvested table.

use tracing::warn;

use crate::table::Record;

/// Columns the ranking stage can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortColumn {
    Rank,
    Author,
    Title,
    Citations,
    Year,
    Publisher,
    Venue,
    Description,
    Source,
}

impl SortColumn {
    /// Maps a persisted column name to its sort key. Names match the CSV
    /// header exactly, including the lowercase `describe` column.
    fn parse(column: &str) -> Option<Self> {
        match column {
            "Rank" => Some(Self::Rank),
            "Author" => Some(Self::Author),
            "Title" => Some(Self::Title),
            "Citations" => Some(Self::Citations),
            "Year" => Some(Self::Year),
            "Publisher" => Some(Self::Publisher),
            "Venue" => Some(Self::Venue),
            "describe" => Some(Self::Description),
            "Source" => Some(Self::Source),
            _ => None,
        }
    }
}

/// Sorts records descending by the requested column, stably.
///
/// An unknown or unsortable column falls back to descending citation count
/// with a warning; this is non-fatal by design.
pub fn sort_records(records: &mut [Record], column: &str) {
    let key = SortColumn::parse(column).unwrap_or_else(|| {
        warn!(column, "cannot sort by requested column, sorting by Citations instead");
        SortColumn::Citations
    });

    match key {
        SortColumn::Rank => records.sort_by(|a, b| b.rank.cmp(&a.rank)),
        SortColumn::Author => records.sort_by(|a, b| b.author.cmp(&a.author)),
        SortColumn::Title => records.sort_by(|a, b| b.title.cmp(&a.title)),
        SortColumn::Citations => {
            records.sort_by(|a, b| b.citation_count.cmp(&a.citation_count));
        }
        SortColumn::Year => records.sort_by(|a, b| b.year.cmp(&a.year)),
        SortColumn::Publisher => records.sort_by(|a, b| b.publisher.cmp(&a.publisher)),
        SortColumn::Venue => records.sort_by(|a, b| b.venue.cmp(&a.venue)),
        SortColumn::Description => records.sort_by(|a, b| b.description.cmp(&a.description)),
        SortColumn::Source => {
            records.sort_by(|a, b| b.source_reference.cmp(&a.source_reference));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rank: u32, citations: u32, year: u16, title: &str) -> Record {
        Record {
            rank,
            author: String::new(),
            title: title.to_string(),
            citation_count: citations,
            year,
            publisher: String::new(),
            venue: String::new(),
            description: String::new(),
            source_reference: String::new(),
            downloaded: false,
        }
    }

    #[test]
    fn test_sort_by_citations_descending() {
        let mut records = vec![record(1, 5, 2020, "a"), record(2, 50, 2019, "b"), record(3, 10, 2021, "c")];
        sort_records(&mut records, "Citations");
        let citations: Vec<u32> = records.iter().map(|r| r.citation_count).collect();
        assert_eq!(citations, vec![50, 10, 5]);
    }

    #[test]
    fn test_sort_by_year_descending() {
        let mut records = vec![record(1, 5, 2018, "a"), record(2, 50, 2022, "b")];
        sort_records(&mut records, "Year");
        assert_eq!(records[0].year, 2022);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut records = vec![
            record(1, 10, 2020, "first"),
            record(2, 10, 2020, "second"),
            record(3, 10, 2020, "third"),
        ];
        sort_records(&mut records, "Citations");
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unknown_column_falls_back_to_citations() {
        let mut by_unknown = vec![record(1, 5, 2020, "a"), record(2, 50, 2019, "b")];
        let mut by_citations = by_unknown.clone();
        sort_records(&mut by_unknown, "NoSuchColumn");
        sort_records(&mut by_citations, "Citations");
        assert_eq!(by_unknown, by_citations);
    }

    #[test]
    fn test_sort_by_title_uses_lexicographic_order() {
        let mut records = vec![record(1, 0, 0, "alpha"), record(2, 0, 0, "zeta")];
        sort_records(&mut records, "Title");
        assert_eq!(records[0].title, "zeta");
    }
}
