//! 批改客户端测试
//!
//! 用 mockito 模拟批改 API，验证请求路径、载荷与响应解析

use std::sync::Arc;
use std::time::Duration;

use batch_question_grader::clients::{GradingClient, QuestionGrader};
use batch_question_grader::config::Config;
use batch_question_grader::error::ApiError;
use batch_question_grader::models::generate::GenerateRequest;
use batch_question_grader::models::question::{Answer, Question};
use batch_question_grader::services::ImportService;

fn sample_question() -> Question {
    Question {
        standard: "CCSS.MATH.7.EE".to_string(),
        statement: "Solve linear equations".to_string(),
        source_id: 42,
        question: "What is the solution of x + 3 = 5?".to_string(),
        answers: vec![
            Answer {
                label: "x = 2".to_string(),
                is_correct: true,
            },
            Answer {
                label: "x = 3".to_string(),
                is_correct: false,
            },
            Answer {
                label: "x = 5".to_string(),
                is_correct: false,
            },
            Answer {
                label: "x = 8".to_string(),
                is_correct: false,
            },
        ],
        difficulty: 2,
        reference_text: "To solve, subtract 3 from both sides.".to_string(),
    }
}

fn client_for(server: &mockito::ServerGuard) -> GradingClient {
    let config = Config {
        api_base_url: server.url(),
        ..Config::default()
    };
    GradingClient::new(&config)
}

fn scorecard_body(overall_pass: bool) -> String {
    serde_json::json!({
        "status": "success",
        "scorecard": {
            "dimensions": [
                {"name": "clarity", "passed": true, "explanation": "The question is clear."},
                {"name": "difficulty", "passed": overall_pass, "explanation": "Matches level."}
            ],
            "overall_pass": overall_pass
        }
    })
    .to_string()
}

#[tokio::test]
async fn grade_posts_question_and_parses_scorecard() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/questions/grade")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "sourceId": 42,
            "question": "What is the solution of x + 3 = 5?",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(scorecard_body(true))
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client.grade(&sample_question()).await.unwrap();

    assert_eq!(response.status, "success");
    assert!(response.scorecard.overall_pass);
    assert_eq!(response.scorecard.dimensions.len(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn grade_compact_hits_compact_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/questions/grade/compact")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(scorecard_body(false))
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client.grade_compact(&sample_question()).await.unwrap();

    assert!(!response.scorecard.overall_pass);
    mock.assert_async().await;
}

#[tokio::test]
async fn grade_surfaces_server_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/questions/grade")
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client.grade(&sample_question()).await.unwrap_err();

    match &error {
        ApiError::BadStatus { endpoint, status } => {
            assert_eq!(endpoint, "questions/grade");
            assert_eq!(status.as_u16(), 500);
        }
        other => panic!("应返回状态码错误，实际是: {other}"),
    }
    assert!(error.to_string().contains("500"));
}

#[tokio::test]
async fn grade_rejects_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/questions/grade")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"status\": \"success\"}")
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client.grade(&sample_question()).await.unwrap_err();
    assert!(matches!(error, ApiError::ResponseParseFailed { .. }));
}

#[tokio::test]
async fn add_questions_posts_array() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/questions/add")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!([
            {"sourceId": 42}
        ])))
        .with_status(200)
        .with_body("{\"success\": true}")
        .create_async()
        .await;

    let client = client_for(&server);
    client.add_questions(&[sample_question()]).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn import_filters_invalid_and_submits_valid_in_background() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/questions/add")
        .with_status(200)
        .with_body("{\"success\": true}")
        .create_async()
        .await;

    let client = Arc::new(client_for(&server));
    let importer = ImportService::new(client);

    let mut broken = sample_question();
    broken.question = "Broken @@@ text".to_string();
    let json =
        serde_json::to_string(&vec![sample_question(), broken]).unwrap();

    let outcome = importer.import(&json).unwrap();
    assert_eq!(outcome.valid.len(), 1);
    assert_eq!(outcome.filtered.len(), 1);

    // 入库在后台进行，等它有机会落地
    for _ in 0..50 {
        if mock.matched_async().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn list_questions_picks_latest_grading() {
    let body = serde_json::json!({
        "success": true,
        "message": "ok",
        "data": [
            {
                "id": 1,
                "standard": "CCSS.MATH.7.EE",
                "statement": "Solve linear equations",
                "sourceId": null,
                "sourceName": "import",
                "question": "What is the solution of x + 3 = 5?",
                "answers": [
                    {"label": "x = 2", "isCorrect": true, "content": {}},
                    {"label": "x = 3", "isCorrect": false, "content": {}}
                ],
                "difficulty": 2,
                "referenceText": null,
                "content": {},
                "created_at": "2025-05-01T10:00:00+00:00",
                "gradings": [
                    {
                        "id": 10,
                        "question_id": 1,
                        "overall_pass": false,
                        "graded_at": "2025-05-01T10:00:00+00:00",
                        "api_response": {
                            "status": "success",
                            "scorecard": {"dimensions": [], "overall_pass": false}
                        }
                    },
                    {
                        "id": 11,
                        "question_id": 1,
                        "overall_pass": true,
                        "graded_at": "2025-06-01T10:00:00+00:00",
                        "api_response": {
                            "status": "success",
                            "scorecard": {"dimensions": [], "overall_pass": true}
                        }
                    }
                ]
            },
            {
                "id": 2,
                "standard": "CCSS.MATH.7.EE",
                "statement": "Solve linear equations",
                "sourceId": 7,
                "sourceName": "import",
                "question": "Ungraded question",
                "answers": [],
                "difficulty": 3,
                "referenceText": "ref",
                "content": {},
                "created_at": "2025-05-02T10:00:00+00:00",
                "gradings": []
            }
        ]
    })
    .to_string();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/questions/list")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let results = client.list_questions().await.unwrap();

    assert_eq!(results.len(), 2);
    // 取最近一次批改记录
    assert_eq!(results[0].passed(), Some(true));
    assert!(!results[0].is_loading);
    // 缺失字段回退默认值
    assert_eq!(results[0].question.source_id, 0);
    assert_eq!(results[0].question.reference_text, "");
    // 没有批改记录的题目：已落定但无结果
    assert!(results[1].response.is_none());
    assert!(results[1].error.is_none());
    assert!(!results[1].is_loading);
}

#[tokio::test]
async fn list_questions_rejects_failure_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/questions/list")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"success\": false, \"message\": \"database offline\", \"data\": []}")
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client.list_questions().await.unwrap_err();
    assert!(error.to_string().contains("database offline"));
}

#[tokio::test]
async fn generate_questions_parses_response() {
    let body = serde_json::json!({
        "status": "success",
        "questions": [
            {
                "standard": "CCSS.MATH.7.EE",
                "statement": "Solve linear equations",
                "sourceId": 0,
                "question": "What is the solution of 2x = 6?",
                "answers": [
                    {"label": "x = 3", "isCorrect": true},
                    {"label": "x = 4", "isCorrect": false},
                    {"label": "x = 6", "isCorrect": false},
                    {"label": "x = 12", "isCorrect": false}
                ],
                "difficulty": 1,
                "referenceText": "Divide both sides by 2."
            }
        ]
    })
    .to_string();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/questions/generate")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "standard": "CCSS.MATH.7.EE",
            "count": 1,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let request = GenerateRequest {
        standard: "CCSS.MATH.7.EE".to_string(),
        query: "linear equations".to_string(),
        count: 1,
    };
    let response = client.generate_questions(&request).await.unwrap();

    assert_eq!(response.questions.len(), 1);
    assert!(response.message.is_none());
    mock.assert_async().await;
}
