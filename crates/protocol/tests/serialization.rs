use rd_protocol::*;
use serde_json;
use serde_yaml;
use std::str::FromStr;

#[test]
fn test_stage_serialization() {
    let json = serde_json::to_value(Stage::RemoveAiFlavor).expect("Failed to serialize Stage");
    assert_eq!(json, "remove-ai-flavor");

    let deserialized: Stage =
        serde_json::from_value(json).expect("Failed to deserialize Stage");
    assert_eq!(deserialized, Stage::RemoveAiFlavor);

    // Every stage id round-trips through its string form
    for stage in Stage::ALL {
        assert_eq!(Stage::from_str(stage.as_str()), Ok(stage));
    }
}

#[test]
fn test_unknown_stage_id_is_rejected() {
    let err = Stage::from_str("polish-dialogue").unwrap_err();
    assert_eq!(err, InvalidStageError::Unknown("polish-dialogue".to_string()));

    let result: Result<Stage, _> = serde_json::from_str("\"polish-dialogue\"");
    assert!(result.is_err());
}

#[test]
fn test_task_status_serialization() {
    let status = TaskStatus::Processing;
    let json = serde_json::to_value(status).expect("Failed to serialize TaskStatus");

    assert_eq!(json, "processing");

    let deserialized: TaskStatus =
        serde_json::from_value(json).expect("Failed to deserialize TaskStatus");
    assert_eq!(deserialized, TaskStatus::Processing);
}

#[test]
fn test_pipeline_status_serialization() {
    let status = PipelineStatus::Idle;
    let json = serde_json::to_value(status).expect("Failed to serialize PipelineStatus");

    assert_eq!(json, "idle");
}

#[test]
fn test_task_serialization() {
    use uuid::Uuid;

    let task = Task {
        id: Uuid::new_v4(),
        chapter_id: "ch1".to_string(),
        chapter_title: "Chapter One".to_string(),
        original_content: "Original text".to_string(),
        current_content: "Refined text".to_string(),
        stages: Stage::ALL.to_vec(),
        completed_stages: vec![Stage::RemoveAiFlavor],
        status: TaskStatus::Pending,
        started_at: Some(chrono::Utc::now()),
        completed_at: None,
        error: None,
    };

    let json = serde_json::to_string(&task).expect("Failed to serialize Task");
    let deserialized: Task = serde_json::from_str(&json).expect("Failed to deserialize Task");

    assert_eq!(deserialized.id, task.id);
    assert_eq!(deserialized.chapter_id, task.chapter_id);
    assert_eq!(deserialized.status, task.status);
    assert_eq!(deserialized.completed_stages, vec![Stage::RemoveAiFlavor]);
    assert_eq!(deserialized.current_stage(), Some(Stage::EnhanceTension));
}

#[test]
fn test_refine_plan_deserialization_from_yaml() {
    let yaml_str = r#"
name: quick-pass
stages:
  - remove-ai-flavor
  - add-techniques
"#;

    let plan: RefinePlan = serde_yaml::from_str(yaml_str).expect("Failed to deserialize RefinePlan");

    assert_eq!(plan.name, "quick-pass");
    assert_eq!(plan.stages, vec![Stage::RemoveAiFlavor, Stage::AddTechniques]);
}

#[test]
fn test_refine_plan_rejects_unknown_stage() {
    let yaml_str = r#"
name: broken
stages:
  - remove-ai-flavor
  - polish-dialogue
"#;

    let result: Result<RefinePlan, _> = serde_yaml::from_str(yaml_str);
    assert!(result.is_err());
}

#[test]
fn test_global_config_serialization() {
    let config = GlobalConfig {
        provider: "mock".to_string(),
        fallback: Some("mock".to_string()),
    };

    let json = serde_json::to_string(&config).expect("Failed to serialize GlobalConfig");
    let deserialized: GlobalConfig =
        serde_json::from_str(&json).expect("Failed to deserialize GlobalConfig");

    assert_eq!(deserialized, config);

    // Missing fields fall back to defaults
    let defaulted: GlobalConfig = serde_json::from_str("{}").expect("Failed to deserialize {}");
    assert_eq!(defaulted, GlobalConfig::default());
    assert_eq!(defaulted.provider, "mock");
}

#[test]
fn test_stage_template_serialization() {
    let template = StageTemplate {
        stage: Stage::EnhanceTension,
        template: "Tighten the pacing of:\n\n{content}".to_string(),
    };

    let json = serde_json::to_string(&template).expect("Failed to serialize StageTemplate");
    let deserialized: StageTemplate =
        serde_json::from_str(&json).expect("Failed to deserialize StageTemplate");

    assert_eq!(deserialized.stage, Stage::EnhanceTension);
    // template body is skipped in serialization (front matter only)
    assert_eq!(deserialized.template, "");
}

#[test]
fn test_refined_export_uses_camel_case() {
    let export = RefinedExport {
        chapter_id: "ch1".to_string(),
        chapter_title: "Chapter One".to_string(),
        original_content: "before".to_string(),
        refined_content: "after".to_string(),
        completed_stages: vec!["Remove AI Flavor".to_string()],
    };

    let json = serde_json::to_value(&export).expect("Failed to serialize RefinedExport");

    assert_eq!(json["chapterId"], "ch1");
    assert_eq!(json["chapterTitle"], "Chapter One");
    assert_eq!(json["originalContent"], "before");
    assert_eq!(json["refinedContent"], "after");
    assert_eq!(json["completedStages"][0], "Remove AI Flavor");
}

#[test]
fn test_op_enum_serialization() {
    use uuid::Uuid;

    let pipeline_id = Uuid::new_v4();
    let op = Op::StartPipeline { pipeline_id };

    let json = serde_json::to_value(&op).expect("Failed to serialize Op");
    assert_eq!(json["type"], "startPipeline");
    assert!(json["payload"].is_object());

    let deserialized: Op = serde_json::from_value(json).expect("Failed to deserialize Op");
    match deserialized {
        Op::StartPipeline { pipeline_id: id } => assert_eq!(id, pipeline_id),
        _ => panic!("Wrong variant"),
    }

    let retry_op = Op::RetryFailedTasks { pipeline_id: Uuid::new_v4() };
    let json = serde_json::to_value(&retry_op).expect("Failed to serialize Op::RetryFailedTasks");
    assert_eq!(json["type"], "retryFailedTasks");
}

#[test]
fn test_event_enum_serialization() {
    use uuid::Uuid;

    let event = Event::TaskStageCompleted {
        pipeline_id: Uuid::new_v4(),
        task_id: Uuid::new_v4(),
        stage: Stage::ImproveCharacter,
        status: TaskStatus::Pending,
    };

    let json = serde_json::to_value(&event).expect("Failed to serialize Event");
    assert_eq!(json["type"], "taskStageCompleted");
    assert_eq!(json["payload"]["stage"], "improve-character");
    assert_eq!(json["payload"]["status"], "pending");

    let progress_event = Event::ProgressUpdated {
        pipeline_id: Uuid::new_v4(),
        progress: Progress {
            total: 8,
            completed: 1,
            failed: 0,
            percentage: 13,
        },
    };
    let json = serde_json::to_value(&progress_event).expect("Failed to serialize Event");
    assert_eq!(json["type"], "progressUpdated");
    assert_eq!(json["payload"]["progress"]["percentage"], 13);
}

#[test]
fn test_prompt_overrides_map_keys() {
    let mut overrides = PromptOverrides::new();
    overrides.insert(Stage::AddTechniques, "Use subtext in:\n\n{content}".to_string());

    let json = serde_json::to_value(&overrides).expect("Failed to serialize PromptOverrides");
    assert!(json["add-techniques"].is_string());

    let deserialized: PromptOverrides =
        serde_json::from_value(json).expect("Failed to deserialize PromptOverrides");
    assert_eq!(deserialized.len(), 1);
    assert!(deserialized.contains_key(&Stage::AddTechniques));
}
