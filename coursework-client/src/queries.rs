//! GraphQL documents sent by the student view.

/// Initial load of an assignment with the viewer's submission and its most
/// recent attempt.
pub const STUDENT_VIEW_QUERY: &str = r#"
query GetAssignment($assignmentLid: ID!) {
  assignment(id: $assignmentLid) {
    _id
    name
    pointsPossible
    gradingType
    muted
    dueAt
    submissionsConnection {
      nodes {
        _id
        attempt
        state
        submissionStatus
        gradingStatus
        score
        grade
        submissionHistoriesConnection(last: 1) {
          pageInfo {
            hasPreviousPage
            hasNextPage
            startCursor
            endCursor
          }
          edges {
            cursor
            node {
              ...SubmissionHistoryFields
            }
          }
        }
      }
    }
  }
}

fragment SubmissionHistoryFields on SubmissionHistory {
  rootId
  attempt
  state
  submissionStatus
  gradingStatus
  submittedAt
  submissionType
  body
  score
  grade
}
"#;

/// The single attempt immediately older than `cursor` in one lineage.
pub const NEXT_SUBMISSION: &str = r#"
query NextSubmission($cursor: String, $submissionID: ID!) {
  legacyNode(type: Submission, _id: $submissionID) {
    ... on Submission {
      submissionHistoriesConnection(last: 1, before: $cursor) {
        pageInfo {
          hasPreviousPage
          hasNextPage
          startCursor
          endCursor
        }
        edges {
          cursor
          node {
            ...SubmissionHistoryFields
          }
        }
      }
    }
  }
}

fragment SubmissionHistoryFields on SubmissionHistory {
  rootId
  attempt
  state
  submissionStatus
  gradingStatus
  submittedAt
  submissionType
  body
  score
  grade
}
"#;
