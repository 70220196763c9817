use serde::{Deserialize, Deserializer, Serialize};

/// Decodes a list that may be `null` on the wire as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "EASY", alias = "Easy")]
    Easy,
    #[serde(rename = "MEDIUM", alias = "Medium")]
    Medium,
    #[serde(rename = "HARD", alias = "Hard")]
    Hard,
}

/// Per-user progress on a question. The favorite list reports
/// `SOLVED`/`ATTEMPTED`/`TO_DO`; the problem list reports `ac`/`notac`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionStatus {
    #[serde(rename = "SOLVED", alias = "ac")]
    Solved,
    #[serde(rename = "ATTEMPTED", alias = "notac")]
    Attempted,
    #[serde(rename = "TO_DO")]
    ToDo,
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTag {
    pub name: String,
    pub slug: String,
}

// Favorite list types
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteListData {
    pub favorite_question_list: Option<FavoriteQuestionList>,
}

/// A favorite list, either one page of it or the accumulated whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteQuestionList {
    #[serde(deserialize_with = "null_as_empty")]
    pub questions: Vec<Question>,
    pub total_length: usize,
    pub has_more: bool,
}

/// The canonical catalog record. Both list endpoints decode into this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: i64,
    pub question_frontend_id: String,
    pub title: String,
    pub title_slug: String,
    #[serde(default)]
    pub translated_title: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub status: Option<QuestionStatus>,
    pub paid_only: bool,
    #[serde(default)]
    pub is_in_my_favorites: bool,
    pub ac_rate: f64,
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topic_tags: Vec<TopicTag>,
}

// Problem list types
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemListData {
    pub problemset_question_list: Option<ProblemsetQuestionList>,
}

#[derive(Debug, Deserialize)]
pub struct ProblemsetQuestionList {
    pub total: usize,
    pub questions: Vec<ProblemRow>,
}

/// A row as the problem list endpoint spells it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRow {
    pub ac_rate: f64,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub freq_bar: Option<f64>,
    pub frontend_question_id: String,
    #[serde(default)]
    pub is_favor: bool,
    pub is_paid_only: bool,
    #[serde(default)]
    pub status: Option<QuestionStatus>,
    pub title: String,
    pub title_slug: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topic_tags: Vec<TopicTag>,
}

impl From<ProblemRow> for Question {
    fn from(row: ProblemRow) -> Self {
        Self {
            id: 0,
            question_frontend_id: row.frontend_question_id,
            title: row.title,
            title_slug: row.title_slug,
            translated_title: None,
            difficulty: row.difficulty,
            status: row.status,
            paid_only: row.is_paid_only,
            is_in_my_favorites: row.is_favor,
            ac_rate: row.ac_rate,
            frequency: row.freq_bar,
            topic_tags: row.topic_tags,
        }
    }
}

/// One page of the full problem list, already mapped onto [`Question`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProblemPage {
    pub questions: Vec<Question>,
    pub total: usize,
}

// Problem detail types
#[derive(Debug, Deserialize)]
pub struct QuestionDetailData {
    pub question: Option<QuestionDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    pub question_id: String,
    pub question_frontend_id: String,
    pub title: String,
    pub title_slug: String,
    #[serde(default)]
    pub translated_title: Option<String>,
    pub is_paid_only: bool,
    pub difficulty: Difficulty,
    pub content: Option<String>,
    #[serde(default)]
    pub similar_questions: Option<String>,
    #[serde(default)]
    pub example_testcases: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topic_tags: Vec<TopicTag>,
    #[serde(default)]
    pub company_tag_stats: Option<String>,
    #[serde(default)]
    pub stats: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hints: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_lists_decode_as_empty() {
        let list: FavoriteQuestionList = serde_json::from_value(json!({
            "questions": [{
                "id": 1, "questionFrontendId": "1", "title": "Two Sum",
                "titleSlug": "two-sum", "translatedTitle": null, "difficulty": "EASY",
                "status": null, "paidOnly": false, "isInMyFavorites": true,
                "acRate": 55.1, "frequency": null, "topicTags": null
            }],
            "totalLength": 1,
            "hasMore": false
        }))
        .unwrap();
        assert!(list.questions[0].topic_tags.is_empty());

        let empty: FavoriteQuestionList = serde_json::from_value(json!({
            "questions": null, "totalLength": 0, "hasMore": false
        }))
        .unwrap();
        assert!(empty.questions.is_empty());
    }

    #[test]
    fn difficulty_accepts_both_spellings() {
        let upper: Difficulty = serde_json::from_value(json!("MEDIUM")).unwrap();
        let title: Difficulty = serde_json::from_value(json!("Medium")).unwrap();
        assert_eq!(upper, Difficulty::Medium);
        assert_eq!(title, Difficulty::Medium);
        assert_eq!(serde_json::to_value(Difficulty::Hard).unwrap(), json!("HARD"));
    }

    #[test]
    fn status_maps_list_endpoint_codes() {
        let ac: QuestionStatus = serde_json::from_value(json!("ac")).unwrap();
        let notac: QuestionStatus = serde_json::from_value(json!("notac")).unwrap();
        let odd: QuestionStatus = serde_json::from_value(json!("SOMETHING_NEW")).unwrap();
        assert_eq!(ac, QuestionStatus::Solved);
        assert_eq!(notac, QuestionStatus::Attempted);
        assert_eq!(odd, QuestionStatus::Unknown);
    }

    #[test]
    fn problem_row_renames_onto_question() {
        let row: ProblemRow = serde_json::from_value(json!({
            "acRate": 55.5,
            "difficulty": "Easy",
            "freqBar": 12.0,
            "frontendQuestionId": "1",
            "isFavor": true,
            "isPaidOnly": false,
            "status": null,
            "title": "Two Sum",
            "titleSlug": "two-sum",
            "topicTags": [{ "name": "Array", "id": "VG9waWNUYWdOb2RlOjU=", "slug": "array" }]
        }))
        .unwrap();

        let q = Question::from(row);
        assert_eq!(q.question_frontend_id, "1");
        assert!(q.is_in_my_favorites);
        assert!(!q.paid_only);
        assert_eq!(q.frequency, Some(12.0));
        assert_eq!(q.status, None);
        assert_eq!(q.topic_tags[0].slug, "array");
    }
}
