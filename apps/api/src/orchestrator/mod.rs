//! Sequences model calls into finished, validated results.
//!
//! Two call shapes:
//! - single-model: prompt → primary model → parser (questions, learning path)
//! - chained: analysis model → drafting model → parser → personalization
//!
//! Every model call runs under a hard timeout and is reported to the call
//! monitor. A failed call is never retried; the orchestrator substitutes
//! canned content instead and marks the result as `ResultSource::Fallback`.
//! Parse failures on live responses are surfaced, not papered over.

pub mod fallback;
pub mod personalize;

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::{CacheKind, ResultCache};
use crate::errors::AppError;
use crate::llm_client::{ModelClient, ModelError, PathDrafter, SkillAnalyzer};
use crate::models::interview::{QuestionSet, ResultSource};
use crate::models::learning::LearningPath;
use crate::models::profile::Profile;
use crate::monitoring::CallMonitor;
use crate::parsing::{parse_learning_path, parse_question_set};
use crate::prompting::knowledge::{enhance_with_context, SimilaritySearch};
use crate::prompting::{self, with_exemplars, with_reasoning_scaffold};
use crate::tasks::{AiJob, CallRecord, TaskQueues};

const DOCUMENT_ANALYSIS_UNAVAILABLE: &str = "문서 분석 결과를 가져오지 못했습니다.";

pub struct Orchestrator {
    primary: Arc<dyn ModelClient>,
    analyzer: Arc<dyn SkillAnalyzer>,
    drafter: Arc<dyn PathDrafter>,
    knowledge: Option<Arc<dyn SimilaritySearch>>,
    cache: Arc<ResultCache>,
    monitor: Arc<CallMonitor>,
    /// Call records go through the AI queue when present, inline otherwise.
    queues: Option<TaskQueues>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        primary: Arc<dyn ModelClient>,
        analyzer: Arc<dyn SkillAnalyzer>,
        drafter: Arc<dyn PathDrafter>,
        cache: Arc<ResultCache>,
        monitor: Arc<CallMonitor>,
        timeout: Duration,
    ) -> Self {
        Self {
            primary,
            analyzer,
            drafter,
            knowledge: None,
            cache,
            monitor,
            queues: None,
            timeout,
        }
    }

    pub fn with_knowledge(mut self, search: Arc<dyn SimilaritySearch>) -> Self {
        self.knowledge = Some(search);
        self
    }

    pub fn with_queues(mut self, queues: TaskQueues) -> Self {
        self.queues = Some(queues);
        self
    }

    pub fn monitor(&self) -> &CallMonitor {
        &self.monitor
    }

    // ── Call plumbing ─────────────────────────────────────────────────────

    /// Runs one model call under the timeout and reports its outcome.
    async fn observe<T, Fut>(&self, service: &str, call: Fut) -> Result<T, ModelError>
    where
        Fut: Future<Output = Result<T, ModelError>>,
    {
        let started = Instant::now();
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ModelError::Timeout {
                service: service.to_string(),
                timeout: self.timeout,
            }),
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        self.report(CallRecord {
            service: service.to_string(),
            duration_ms,
            success: result.is_ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
        });
        result
    }

    fn report(&self, record: CallRecord) {
        if let Some(queues) = &self.queues {
            // On rejection the record is applied inline rather than lost.
            if queues.submit_ai(AiJob::CallCompleted(record.clone())).is_ok() {
                return;
            }
        }
        self.monitor.record_call(
            &record.service,
            record.duration_ms,
            record.success,
            record.error.as_deref(),
        );
    }

    // ── Single-model path ─────────────────────────────────────────────────

    /// Interview questions for `profile`. Cached per profile fingerprint.
    pub async fn generate_questions(&self, profile: &Profile) -> Result<QuestionSet, AppError> {
        let key = ResultCache::fingerprint(profile, CacheKind::Questions);
        let set = self
            .cache
            .questions
            .get_or_try_insert_with(&key, || self.fresh_questions(profile))
            .await?;
        if set.source == ResultSource::Fallback {
            self.cache.questions.remove(&key).await;
        }
        Ok(set)
    }

    async fn fresh_questions(&self, profile: &Profile) -> Result<QuestionSet, AppError> {
        info!("Generating interview questions for profile {}", profile.id);

        let base = prompting::interview_prompt(profile)?;
        let query = format!("{} {}", profile.role.display_name(), profile.skills.join(" "));
        let enriched = enhance_with_context(base.clone(), &query, self.knowledge.as_deref()).await;
        let prompt = with_exemplars(with_reasoning_scaffold(enriched));
        debug!("Interview prompt: {} chars", prompt.chars().count());

        let set = match self
            .observe(self.primary.name(), self.primary.invoke(&prompt))
            .await
        {
            Ok(raw) => {
                debug!("Interview response: {} chars", raw.chars().count());
                parse_question_set(&raw, ResultSource::Model)?
            }
            Err(e) => {
                warn!(
                    "{} call failed ({e}), falling back to canned response",
                    self.primary.name()
                );
                let mut set = parse_question_set(
                    fallback::canned_questions(&base),
                    ResultSource::Fallback,
                )?;
                set.difficulty = profile.experience_tier();
                set
            }
        };

        info!(
            "Generated {} interview questions for profile {} ({:?})",
            set.question_count(),
            profile.id,
            set.source
        );
        Ok(set)
    }

    /// Learning path from the primary model alone. Independent of the
    /// chained variant.
    pub async fn generate_learning_path(&self, profile: &Profile) -> Result<LearningPath, AppError> {
        let key = ResultCache::fingerprint(profile, CacheKind::LearningPath);
        let path = self
            .cache
            .paths
            .get_or_try_insert_with(&key, || self.fresh_learning_path(profile))
            .await?;
        if path.source == ResultSource::Fallback {
            self.cache.paths.remove(&key).await;
        }
        Ok(path)
    }

    async fn fresh_learning_path(&self, profile: &Profile) -> Result<LearningPath, AppError> {
        info!("Generating learning path for profile {}", profile.id);

        let prompt = prompting::learning_path_prompt(profile)?;
        debug!("Learning path prompt: {} chars", prompt.chars().count());

        let path = match self
            .observe(self.primary.name(), self.primary.invoke(&prompt))
            .await
        {
            Ok(raw) => parse_learning_path(&raw, ResultSource::Model)?,
            Err(e) => {
                warn!(
                    "{} call failed ({e}), falling back to canned response",
                    self.primary.name()
                );
                parse_learning_path(fallback::canned_learning_path(&prompt), ResultSource::Fallback)?
            }
        };

        info!(
            "Generated learning path for profile {}: {} steps ({:?})",
            profile.id,
            path.total_steps(),
            path.source
        );
        Ok(path)
    }

    // ── Chained path ──────────────────────────────────────────────────────

    /// Analysis model → drafting model → personalization and filtering.
    pub async fn generate_learning_path_chained(
        &self,
        profile: &Profile,
    ) -> Result<LearningPath, AppError> {
        let key = ResultCache::fingerprint(profile, CacheKind::ChainedLearningPath);
        let path = self
            .cache
            .paths
            .get_or_try_insert_with(&key, || self.fresh_chained_path(profile))
            .await?;
        if path.source == ResultSource::Fallback {
            self.cache.paths.remove(&key).await;
        }
        Ok(path)
    }

    async fn fresh_chained_path(&self, profile: &Profile) -> Result<LearningPath, AppError> {
        info!(
            "Generating chained learning path for profile {} ({} → {})",
            profile.id,
            self.analyzer.name(),
            self.drafter.name()
        );

        let (analysis, analysis_degraded) = self.skill_analysis(profile).await?;
        debug!("Skill analysis: {} chars", analysis.chars().count());

        let (draft, draft_degraded) = match self
            .observe(self.drafter.name(), self.drafter.draft_learning_path(&analysis))
            .await
        {
            Ok(draft) => (draft, false),
            Err(ModelError::Prompt(e)) => return Err(e.into()),
            Err(e) => {
                warn!(
                    "{} call failed ({e}), falling back to canned response",
                    self.drafter.name()
                );
                (fallback::CANNED_DRAFT.to_string(), true)
            }
        };

        let source = if analysis_degraded || draft_degraded {
            ResultSource::Fallback
        } else {
            ResultSource::Model
        };
        let path = personalize::personalize(parse_learning_path(&draft, source)?, profile)?;

        info!(
            "Chained learning path for profile {}: {} steps ({:?})",
            profile.id,
            path.total_steps(),
            path.source
        );
        Ok(path)
    }

    /// Tech-skill analysis text, cached as a raw response. The flag is set
    /// when canned text stood in for a failed call; canned text is not cached.
    async fn skill_analysis(&self, profile: &Profile) -> Result<(String, bool), AppError> {
        let key = ResultCache::fingerprint(profile, CacheKind::SkillAnalysis);
        let result = self
            .cache
            .responses
            .get_or_try_insert_with(&key, || {
                self.observe(self.analyzer.name(), self.analyzer.analyze_tech_skills(profile))
            })
            .await;

        match result {
            Ok(text) => Ok((text, false)),
            Err(ModelError::Prompt(e)) => Err(e.into()),
            Err(e) => {
                warn!(
                    "{} call failed ({e}), falling back to canned response",
                    self.analyzer.name()
                );
                let ctx = prompting::PromptContext::from_profile(profile);
                Ok((
                    fallback::canned_analysis(ctx.role, ctx.years, &ctx.skills),
                    true,
                ))
            }
        }
    }

    /// Both secondary models' views of the candidate plus a synthesis line.
    pub async fn combine_analysis(&self, profile: &Profile) -> Result<String, AppError> {
        info!("Combining model analyses for profile {}", profile.id);

        let (tech, _) = self.skill_analysis(profile).await?;
        let document = match self
            .observe(
                self.drafter.name(),
                self.drafter.summarize_document(&profile.summary),
            )
            .await
        {
            Ok(text) => text,
            Err(ModelError::Prompt(e)) => return Err(e.into()),
            Err(e) => {
                warn!(
                    "{} call failed ({e}), falling back to canned response",
                    self.drafter.name()
                );
                DOCUMENT_ANALYSIS_UNAVAILABLE.to_string()
            }
        };

        Ok(format!(
            "[{} 분석]\n{tech}\n\n[{} 분석]\n{document}\n\n[종합 평가]\n\
             두 AI 모델의 분석을 종합한 결과, 지원자는 {} 분야에서 {} 수준의 역량을 보유하고 있습니다.\n",
            self.analyzer.name(),
            self.drafter.name(),
            profile.role.display_name(),
            profile.experience_tier().display_name()
        ))
    }

    async fn check_health<C: ModelClient + ?Sized>(&self, client: &C) -> bool {
        match self.observe(client.name(), client.health_check()).await {
            Ok(()) => true,
            Err(e) => {
                warn!("{} health check failed: {e}", client.name());
                false
            }
        }
    }

    // ── Maintenance ───────────────────────────────────────────────────────

    /// Drops every cached result derived from the profile.
    pub async fn invalidate(&self, profile_id: Uuid) -> usize {
        self.cache.invalidate_profile(profile_id).await
    }

    /// Real throwaway invocation against every configured model. Slow.
    /// Each check is timed and billed like any other call.
    pub async fn model_health(&self) -> BTreeMap<String, bool> {
        let (primary, analyzer, drafter) = tokio::join!(
            self.check_health(&*self.primary),
            self.check_health(&*self.analyzer),
            self.check_health(&*self.drafter)
        );
        BTreeMap::from([
            (self.primary.name().to_string(), primary),
            (self.analyzer.name().to_string(), analyzer),
            (self.drafter.name().to_string(), drafter),
        ])
    }
}
