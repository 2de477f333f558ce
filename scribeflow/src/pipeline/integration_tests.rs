//! Integration tests for sequential pipeline execution.

#[cfg(test)]
mod tests {
    use crate::context::{Blackboard, RunIdentity, SessionKey, StageContext};
    use crate::core::{StageOutput, StageStatus};
    use crate::events::{
        CollectingEventSink, PIPELINE_COMPLETED, STAGE_COMPLETED, STAGE_FAILED,
        STAGE_OUTPUT_MISSING, STAGE_STARTED,
    };
    use crate::pipeline::{FallbackDocument, FinalOutput, PipelineBuilder};
    use crate::stages::{FnStage, Stage};
    use crate::testing::{
        assert_field_absent, assert_field_set, FailingStage, RecordingStage, StaticStage,
    };
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_later_stage_observes_earlier_write() {
        let a = Arc::new(RecordingStage::new("A", "1,2"));
        let b = Arc::new(RecordingStage::new("B", "done"));

        let pipeline = PipelineBuilder::new("ordering")
            .seed("task")
            .stage("A", a.clone(), &["task"], "subtasks")
            .unwrap()
            .stage("B", b.clone(), &["task", "subtasks"], "result")
            .unwrap()
            .build()
            .unwrap();

        let run = pipeline.run(Blackboard::new().with_field("task", "X")).await;

        assert_eq!(a.executions()[0].inputs["task"].as_deref(), Some("X"));
        assert_eq!(b.executions()[0].inputs["subtasks"].as_deref(), Some("1,2"));
        assert_eq!(run.final_output, FinalOutput::Produced("done".to_string()));
        assert!(!run.is_degraded());
    }

    #[tokio::test]
    async fn test_stage_order_is_list_order() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let mut builder = PipelineBuilder::new("order");
        for name in ["first", "second", "third"] {
            let order = order.clone();
            let stage = FnStage::new(name, move |ctx: &StageContext<'_>| {
                order.lock().push(ctx.stage_name().to_string());
                StageOutput::ok_text(ctx.stage_name())
            });
            builder = builder
                .stage(name, Arc::new(stage), &[], format!("{name}_out"))
                .unwrap();
        }

        let run = builder.build().unwrap().run(Blackboard::new()).await;

        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
        assert_eq!(run.final_text(), "third");
        assert_eq!(run.board.len(), 3);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_run() {
        let tail = Arc::new(RecordingStage::new("tail", "tail ran"));

        let pipeline = PipelineBuilder::new("tolerant")
            .seed("task")
            .stage("head", Arc::new(FailingStage::new("head", "provider down")), &["task"], "subtasks")
            .unwrap()
            .stage("tail", tail.clone(), &["task", "subtasks"], "report")
            .unwrap()
            .build()
            .unwrap();

        let run = pipeline.run(Blackboard::new().with_field("task", "X")).await;

        assert_eq!(tail.execution_count(), 1);
        assert_eq!(tail.executions()[0].inputs["subtasks"], None);
        assert_field_absent(&run, "subtasks");
        assert_field_set(&run, "report");
        assert_eq!(run.failed_stages(), vec!["head"]);

        let head = run.stage("head").unwrap();
        assert_eq!(head.status, StageStatus::Fail);
        assert_eq!(head.error.as_deref(), Some("provider down"));

        let tail_record = run.stage("tail").unwrap();
        assert_eq!(tail_record.missing_inputs, vec!["subtasks"]);
        assert!(run.is_degraded());
    }

    #[tokio::test]
    async fn test_missing_final_field_yields_fallback() {
        let fallback = FallbackDocument::new("# Agent System Plan (Partial)")
            .section("Subtasks", "subtasks")
            .section("Agent Descriptions", "agent_descriptions");

        let pipeline = PipelineBuilder::new("plan")
            .seed("task")
            .stage("analyze", Arc::new(StaticStage::new("analyze", "1. a")), &["task"], "subtasks")
            .unwrap()
            .stage(
                "design",
                Arc::new(FailingStage::new("design", "timeout")),
                &["task", "subtasks"],
                "agent_descriptions",
            )
            .unwrap()
            .stage(
                "describe",
                Arc::new(RecordingStage::silent("describe")),
                &["subtasks", "agent_descriptions"],
                "final_description",
            )
            .unwrap()
            .fallback(fallback)
            .build()
            .unwrap();

        let run = pipeline.run(Blackboard::new().with_field("task", "X")).await;

        assert!(run.final_output.is_fallback());
        assert_eq!(
            run.final_text(),
            "# Agent System Plan (Partial)\n\n## Subtasks\n1. a\n\n## Agent Descriptions\nNot set\n"
        );
    }

    #[tokio::test]
    async fn test_default_fallback_lists_intermediate_fields() {
        let pipeline = PipelineBuilder::new("Blog")
            .stage("plan", Arc::new(StaticStage::new("plan", "roadmap text")), &[], "roadmap")
            .unwrap()
            .stage("write", Arc::new(FailingStage::new("write", "x")), &["roadmap"], "posts")
            .unwrap()
            .build()
            .unwrap();

        let run = pipeline.run(Blackboard::new()).await;

        assert_eq!(run.final_text(), "# Blog (Partial)\n\n## Roadmap\nroadmap text\n");
    }

    #[tokio::test]
    async fn test_events_emitted_in_order() {
        let sink = Arc::new(CollectingEventSink::new());

        let pipeline = PipelineBuilder::new("events")
            .stage("ok", Arc::new(StaticStage::new("ok", "v")), &[], "a")
            .unwrap()
            .stage("bad", Arc::new(FailingStage::new("bad", "e")), &[], "b")
            .unwrap()
            .final_field("a")
            .event_sink(sink.clone())
            .build()
            .unwrap();

        let run = pipeline.run(Blackboard::new()).await;

        assert_eq!(
            sink.event_types(),
            vec![
                STAGE_STARTED,
                STAGE_COMPLETED,
                STAGE_STARTED,
                STAGE_FAILED,
                STAGE_OUTPUT_MISSING,
                PIPELINE_COMPLETED,
            ]
        );
        assert_eq!(run.final_text(), "v");
    }

    #[tokio::test]
    async fn test_events_carry_run_id() {
        let sink = Arc::new(CollectingEventSink::new());
        let pipeline = PipelineBuilder::new("ids")
            .stage("only", Arc::new(StaticStage::new("only", "v")), &[], "out")
            .unwrap()
            .event_sink(sink.clone())
            .build()
            .unwrap();

        let run_id = RunIdentity::new().with_session(SessionKey::new("app", "user", "session"));
        let expected = run_id.pipeline_run_id.to_string();
        let run = pipeline.run_with_identity(Blackboard::new(), run_id).await;

        for (_, data) in sink.events() {
            let data = data.unwrap();
            assert_eq!(data["pipeline_run_id"], serde_json::json!(expected));
        }
        assert_eq!(run.run_id.session.unwrap().to_string(), "app/user/session");
    }

    #[tokio::test]
    async fn test_rewriting_a_field_keeps_last_value() {
        let calls = Arc::new(AtomicUsize::new(0));

        let make = |name: &'static str| {
            let calls = calls.clone();
            Arc::new(FnStage::new(name, move |_ctx: &StageContext<'_>| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                StageOutput::ok_text(format!("draft {n}"))
            })) as Arc<dyn Stage>
        };

        let pipeline = PipelineBuilder::new("rewrite")
            .stage("draft", make("draft"), &[], "text")
            .unwrap()
            .stage("revise", make("revise"), &["text"], "text_v2")
            .unwrap()
            .stage("polish", make("polish"), &["text_v2"], "text")
            .unwrap()
            .final_field("text")
            .build()
            .unwrap();

        let run = pipeline.run(Blackboard::new()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(run.final_text(), "draft 2");
    }
}
