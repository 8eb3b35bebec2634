use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::{SearchCache, ViewModel};

const MAX_SEARCH_RESULTS: usize = 200;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    /// Point indices matching the search box, best match first.
    pub(in crate::app) fn search_matches(&mut self) -> Arc<Vec<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            return Arc::new(Vec::new());
        }

        if let Some(cached) = &self.search_cache
            && cached.query == query
        {
            return Arc::clone(&cached.matches);
        }

        let matcher = SkimMatcherV2::default();
        let labels = self.dataset.labels();
        let mut scored = self
            .dataset
            .concepts()
            .iter()
            .enumerate()
            .filter_map(|(index, concept)| {
                let by_title = fuzzy_match_score(&matcher, &concept.title, query);
                let by_label = labels
                    .label_of(index)
                    .and_then(|label| fuzzy_match_score(&matcher, label, query));
                by_title.max(by_label).map(|score| (score, index))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.truncate(MAX_SEARCH_RESULTS);

        let matches = Arc::new(scored.into_iter().map(|(_, index)| index).collect::<Vec<_>>());
        self.search_cache = Some(SearchCache {
            query: query.to_owned(),
            matches: Arc::clone(&matches),
        });
        matches
    }
}
