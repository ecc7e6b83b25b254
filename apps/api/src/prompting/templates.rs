// Prompt templates. Placeholders are `{name}`; see `PromptBuilder`.
// The headers below identify each prompt kind and must appear verbatim in
// their template.

pub const INTERVIEW_GUIDE_HEADER: &str = "[면접 질문 생성 가이드라인]";
pub const LEARNING_PATH_GUIDE_HEADER: &str = "[학습 경로 생성 가이드라인]";
pub const PATH_DRAFT_HEADER: &str = "[기술 역량 분석]";

pub const INTERVIEW_TEMPLATE: &str = r#"당신은 {role} 분야의 전문 면접관입니다.
지원자의 이력서를 바탕으로 맞춤형 면접 질문을 생성해주세요.

[지원자 정보]
- 직무: {role}
- 경력: {years}년 ({level})
- 경력 요약: {summary}
- 프로젝트 경험: {projects}
- 기술 스택: {skills}

[면접 질문 생성 가이드라인]
1. 지원자의 경력 수준({level})에 맞는 난이도의 질문을 생성하세요.
2. 기술적 깊이와 실무 경험을 모두 검증할 수 있는 질문을 포함하세요.
3. 지원자의 기술 스택과 프로젝트 경험을 바탕으로 한 구체적인 질문을 생성하세요.
4. 최소 5개, 최대 10개의 질문을 생성하세요.
5. 각 질문은 구체적이고 명확해야 하며, 실제 면접에서 사용할 수 있는 수준이어야 합니다.

[질문 유형]
- 기술적 질문: 기술 스택에 대한 깊이 있는 이해 검증
- 실무 경험 질문: 프로젝트 경험을 바탕으로 한 문제 해결 능력 검증
- 아키텍처/설계 질문: 시스템 설계 이해도 검증
- 성능/최적화 질문: 성능 문제 해결 능력 검증
- 협업/커뮤니케이션 질문: 팀워크와 의사소통 능력 검증

반드시 JSON 형식으로만 응답해주세요. 다른 설명이나 텍스트는 포함하지 마세요.

{schema}"#;

pub const INTERVIEW_SCHEMA: &str = r#"응답 형식:
{
    "questions": ["질문1", "질문2", "질문3", "질문4", "질문5"],
    "analysis": "지원자의 강점과 약점을 분석한 내용 (100자 이내)",
    "difficulty": "{tier}"
}"#;

pub const LEARNING_PATH_TEMPLATE: &str = r#"당신은 {role} 분야의 전문 커리어 코치입니다.
지원자의 현재 상황을 바탕으로 맞춤형 학습 경로를 제시해주세요.

[지원자 정보]
- 직무: {role}
- 경력: {years}년 ({level})
- 경력 요약: {summary}
- 프로젝트 경험: {projects}
- 기술 스택: {skills}

[학습 경로 생성 가이드라인]
1. 현재 수준에서 다음 단계로 발전할 수 있는 실현 가능한 학습 경로를 제시하세요.
2. 각 학습 단계는 구체적이고 명확한 목표를 가져야 합니다.
3. 최소 3개, 최대 5개의 학습 단계를 제시하세요.
4. 각 단계는 이전 단계를 기반으로 한 논리적인 순서로 구성하세요.

[학습 단계 구성 요소]
- title: 명확하고 구체적인 학습 단계 제목
- description: 해당 단계에서 학습할 내용의 상세 설명
- difficulty: BEGINNER, INTERMEDIATE, ADVANCED 중 선택
- estimatedTime: 실제 가능한 예상 소요 시간 (예: "2주", "1개월")
- resources: 구체적인 학습 리소스 (책, 강의, 실습 프로젝트 등)
- learningObjective: 해당 단계를 완료했을 때 달성할 수 있는 목표

반드시 JSON 형식으로만 응답해주세요. 다른 설명이나 텍스트는 포함하지 마세요.

{schema}"#;

pub const LEARNING_PATH_SCHEMA: &str = r#"응답 형식:
{
    "jobRole": "{role}",
    "experienceLevel": "{level}",
    "learningSteps": [
        {
            "title": "학습 단계 제목",
            "description": "상세 설명",
            "difficulty": "BEGINNER",
            "estimatedTime": "2주",
            "resources": ["추천 리소스1", "추천 리소스2"],
            "learningObjective": "학습 목표"
        }
    ],
    "overallStrategy": "전체 학습 전략 (100자 이내)",
    "estimatedDuration": "전체 예상 기간"
}"#;

pub const SKILL_ANALYSIS_TEMPLATE: &str = r#"다음 지원자의 기술 역량을 분석해주세요.

- 직무: {role}
- 경력: {years}년 ({level})
- 경력 요약: {summary}
- 프로젝트 경험: {projects}
- 기술 스택: {skills}

기술적 강점 3가지와 보완이 필요한 약점 3가지를 각각 한 문장으로 정리하고,
마지막 줄에 가장 먼저 보완해야 할 영역을 적어주세요."#;

pub const PATH_DRAFT_TEMPLATE: &str = r#"아래 기술 역량 분석을 바탕으로 학습 경로 초안을 작성해주세요.

[기술 역량 분석]
{analysis}

3~5개의 단계로 구성하고, difficulty는 BEGINNER, INTERMEDIATE, ADVANCED 중 하나만 사용하세요.
반드시 다음 JSON 형식으로만 응답해주세요.
{
    "learning_steps": [
        {
            "title": "단계 제목",
            "description": "상세 설명",
            "difficulty": "BEGINNER",
            "estimated_time": "2주",
            "resources": ["리소스1", "리소스2"],
            "learning_objective": "학습 목표"
        }
    ],
    "overall_strategy": "전체 전략",
    "estimated_duration": "전체 예상 기간"
}"#;

pub const DOCUMENT_SUMMARY_TEMPLATE: &str = r#"다음 경력 요약 문서를 읽고 지원자의 핵심 역량과 성장 방향을 3문장 이내로 요약해주세요.

[문서]
{document}"#;

pub const REASONING_SCAFFOLD: &str = r#"

[사고 과정]
먼저 지원자의 기술 스택과 경력을 바탕으로 어떤 역량을 검증해야 할지 단계별로 생각해 본 뒤,
그 생각의 과정을 바탕으로 질문을 생성해 주세요.

단계별 사고 과정:
1. 지원자의 기술 스택 분석 - 어떤 기술이 핵심인가?
2. 경력 수준에 따른 기대 역량 파악 - 이 수준에서 어떤 것을 알고 있어야 하는가?
3. 실무 경험 검증 포인트 식별 - 어떤 프로젝트 경험이 중요한가?
4. 아키텍처 및 설계 능력 검증 필요성 판단 - 시스템 설계 경험이 있는가?
5. 최신 기술 트렌드 반영 - 최신 기술에 대한 이해도는?

위 사고 과정을 바탕으로 질문을 생성해 주세요."#;

pub const FEW_SHOT_EXEMPLARS: &str = r#"

[좋은 질문 예시]
다음은 좋은 질문의 예시입니다. 이와 같은 수준과 깊이로 질문을 생성해 주세요.

예시 1: "MSA 환경에서 분산 트랜잭션을 어떻게 처리하셨나요? Saga 패턴 적용 시 장단점과 실제 겪었던 어려움은 무엇이었나요?"

예시 2: "대용량 데이터 처리 시 성능 최적화를 위해 어떤 전략을 사용하셨나요? 인덱싱, 쿼리 최적화, 캐싱 중 어떤 방법이 가장 효과적이었는지 구체적인 사례와 함께 설명해 주세요."

예시 3: "마이크로서비스 간 통신에서 Circuit Breaker 패턴을 구현한 경험이 있나요? 어떤 상황에서 적용했고, 실제로 어떤 이점을 얻었는지 설명해 주세요."

위 예시들을 참고하여 지원자에게 적합한 질문을 생성해 주세요."#;

/// Header of the block appended by knowledge-base enrichment.
pub const REFERENCE_HEADER: &str = "\n\n[참고 자료]\n";
