use serde::Serialize;
use serde_json::{Map, Value};

pub const FAVORITE_QUESTION_LIST_QUERY: &str = r#"
query favoriteQuestionList($favoriteSlug: String!, $filter: FavoriteQuestionFilterInput, $filtersV2: QuestionFilterInput, $searchKeyword: String, $sortBy: QuestionSortByInput, $limit: Int, $skip: Int, $version: String = "v2") {
  favoriteQuestionList(
    favoriteSlug: $favoriteSlug
    filter: $filter
    filtersV2: $filtersV2
    searchKeyword: $searchKeyword
    sortBy: $sortBy
    limit: $limit
    skip: $skip
    version: $version
  ) {
    questions {
      difficulty
      id
      paidOnly
      questionFrontendId
      status
      title
      titleSlug
      translatedTitle
      isInMyFavorites
      frequency
      acRate
      topicTags {
        name
        nameTranslated
        slug
      }
    }
    totalLength
    hasMore
  }
}
"#;

pub const PROBLEMSET_QUESTION_LIST_QUERY: &str = r#"
query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
  problemsetQuestionList: questionList(
    categorySlug: $categorySlug
    limit: $limit
    skip: $skip
    filters: $filters
  ) {
    total: totalNum
    questions: data {
      acRate
      difficulty
      freqBar
      frontendQuestionId: questionFrontendId
      isFavor
      isPaidOnly
      status
      title
      titleSlug
      topicTags {
        name
        id
        slug
      }
    }
  }
}
"#;

pub const QUESTION_DATA_QUERY: &str = r#"
query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    translatedTitle
    isPaidOnly
    difficulty
    content
    similarQuestions
    exampleTestcases
    topicTags {
      name
      slug
    }
    companyTagStats
    stats
    hints
  }
}
"#;

/// Body of a GraphQL POST: `{query, variables, operationName}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest<V> {
    pub query: &'static str,
    pub variables: V,
    pub operation_name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteListVariables {
    pub skip: usize,
    pub limit: usize,
    pub favorite_slug: String,
    pub filters_v2: FiltersV2,
    pub search_keyword: String,
    pub sort_by: SortBy,
}

/// Filter block the favorite list endpoint requires. Every filter is sent
/// empty so the server returns the list unfiltered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersV2 {
    pub filter_combine_type: &'static str,
    pub status_filter: SlugFilter,
    pub difficulty_filter: SlugFilter,
    pub language_filter: SlugFilter,
    pub topic_filter: SlugFilter,
    pub acceptance_filter: Map<String, Value>,
    pub frequency_filter: Map<String, Value>,
    pub frontend_id_filter: Map<String, Value>,
    pub last_submitted_filter: Map<String, Value>,
    pub published_filter: Map<String, Value>,
    pub company_filter: SlugFilter,
    pub position_filter: SlugFilter,
    pub premium_filter: SlugFilter,
}

/// A `{<field>: [...], operator: "IS"}` filter. The list field name differs
/// per filter, so it is flattened in from a one-entry map.
#[derive(Debug, Clone, Serialize)]
pub struct SlugFilter {
    #[serde(flatten)]
    pub values: Map<String, Value>,
    pub operator: &'static str,
}

impl SlugFilter {
    fn empty(field: &str) -> Self {
        let mut values = Map::new();
        values.insert(field.to_string(), Value::Array(Vec::new()));
        Self {
            values,
            operator: "IS",
        }
    }
}

impl Default for FiltersV2 {
    fn default() -> Self {
        Self {
            filter_combine_type: "ALL",
            status_filter: SlugFilter::empty("questionStatuses"),
            difficulty_filter: SlugFilter::empty("difficulties"),
            language_filter: SlugFilter::empty("languageSlugs"),
            topic_filter: SlugFilter::empty("topicSlugs"),
            acceptance_filter: Map::new(),
            frequency_filter: Map::new(),
            frontend_id_filter: Map::new(),
            last_submitted_filter: Map::new(),
            published_filter: Map::new(),
            company_filter: SlugFilter::empty("companySlugs"),
            position_filter: SlugFilter::empty("positionSlugs"),
            premium_filter: SlugFilter::empty("premiumStatus"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortBy {
    pub sort_field: &'static str,
    pub sort_order: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemListVariables {
    pub category_slug: String,
    pub skip: usize,
    pub limit: usize,
    pub filters: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDataVariables {
    pub title_slug: String,
}

pub fn favorite_question_list(
    favorite_slug: &str,
    skip: usize,
    limit: usize,
) -> GraphQLRequest<FavoriteListVariables> {
    GraphQLRequest {
        query: FAVORITE_QUESTION_LIST_QUERY,
        variables: FavoriteListVariables {
            skip,
            limit,
            favorite_slug: favorite_slug.to_string(),
            filters_v2: FiltersV2::default(),
            search_keyword: String::new(),
            sort_by: SortBy {
                sort_field: "CUSTOM",
                sort_order: "ASCENDING",
            },
        },
        operation_name: "favoriteQuestionList",
    }
}

pub fn problemset_question_list(skip: usize, limit: usize) -> GraphQLRequest<ProblemListVariables> {
    GraphQLRequest {
        query: PROBLEMSET_QUESTION_LIST_QUERY,
        variables: ProblemListVariables {
            category_slug: String::new(),
            skip,
            limit,
            filters: Map::new(),
        },
        operation_name: "problemsetQuestionList",
    }
}

pub fn question_data(title_slug: &str) -> GraphQLRequest<QuestionDataVariables> {
    GraphQLRequest {
        query: QUESTION_DATA_QUERY,
        variables: QuestionDataVariables {
            title_slug: title_slug.to_string(),
        },
        operation_name: "questionData",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn favorite_list_request_matches_wire_shape() {
        let req = favorite_question_list("facebook-thirty-days", 20, 10);
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["operationName"], "favoriteQuestionList");
        assert_eq!(body["query"], FAVORITE_QUESTION_LIST_QUERY);
        assert_eq!(body["variables"]["skip"], 20);
        assert_eq!(body["variables"]["limit"], 10);
        assert_eq!(body["variables"]["favoriteSlug"], "facebook-thirty-days");
        assert_eq!(body["variables"]["searchKeyword"], "");
        assert_eq!(
            body["variables"]["sortBy"],
            json!({ "sortField": "CUSTOM", "sortOrder": "ASCENDING" })
        );

        let filters = &body["variables"]["filtersV2"];
        assert_eq!(filters["filterCombineType"], "ALL");
        assert_eq!(
            filters["statusFilter"],
            json!({ "questionStatuses": [], "operator": "IS" })
        );
        assert_eq!(
            filters["premiumFilter"],
            json!({ "premiumStatus": [], "operator": "IS" })
        );
        assert_eq!(filters["acceptanceFilter"], json!({}));
    }

    #[test]
    fn problem_list_request_carries_paging() {
        let body = serde_json::to_value(problemset_question_list(50, 25)).unwrap();
        assert_eq!(body["operationName"], "problemsetQuestionList");
        assert_eq!(
            body["variables"],
            json!({ "categorySlug": "", "skip": 50, "limit": 25, "filters": {} })
        );
    }

    #[test]
    fn malformed_slug_is_passed_through() {
        let body = serde_json::to_value(question_data("not a slug!")).unwrap();
        assert_eq!(body["operationName"], "questionData");
        assert_eq!(body["variables"]["titleSlug"], "not a slug!");
    }
}
