//! Prompt templates for both stages

use crate::debate::entities::TranscriptEntry;
use crate::evaluation::artifact::{Artifact, EvaluationMode};
use crate::evaluation::verdict::{JudgeVerdict, VerdictOutcome, format_score};
use crate::judge::entities::JudgeIdentity;
use serde::{Deserialize, Serialize};

/// Priority-rule parameters rendered into the selector instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorPolicy {
    /// Turns looked back at when detecting two-party ping-pong
    pub pingpong_window: usize,
    /// Transcript length after which the closer is favoured
    pub wrap_up_after: usize,
    /// Judge id that delivers the wrap-up
    pub closer: String,
}

impl SelectorPolicy {
    pub fn new(closer: impl Into<String>) -> Self {
        Self {
            pingpong_window: 6,
            wrap_up_after: 15,
            closer: closer.into(),
        }
    }

    pub fn with_pingpong_window(mut self, window: usize) -> Self {
        self.pingpong_window = window;
        self
    }

    pub fn with_wrap_up_after(mut self, turns: usize) -> Self {
        self.wrap_up_after = turns;
        self
    }

    /// Keep the closer only if it is among `participants`, else hand the
    /// wrap-up to the first participant.
    pub fn restricted_to(mut self, participants: &[&JudgeIdentity]) -> Self {
        if !participants.iter().any(|j| j.id == self.closer)
            && let Some(first) = participants.first()
        {
            self.closer = first.id.clone();
        }
        self
    }
}

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Stage-One guide for scoring mode
    pub fn scoring_guide() -> &'static str {
        r#"
[System instruction: immersive role-play]

You are a guest judge on the hit web show "AI Roast Show".
Your job is not to serve the user but to deliver opinions.
The audience wants your personality, your biases and your mood, not balanced filler.

## Core principles

1. No AI voice:
   - Never say "overall", "in conclusion", "as an AI" or "it is worth noting".
   - Never sit on the fence. Your bias is your charm.
   - Talk like a person: slang, rhetorical questions and exclamation marks are fine.

2. Thinking process:
   - Step 1: <inner_monologue>
     This is your green room. Say exactly what you think about the piece, as bluntly as you like.
   - Step 2: JSON output
     Turn the monologue into remarks for the audience, keeping your edge and your persona.

## Output format

<inner_monologue>
(your real thoughts, the blunter the better)
</inner_monologue>
```json
{
  "inner_monologue": "Is this colour scheme serious? It looks like my grandma's expired bedsheets.",
  "overall_score": 4.5,
  "one_liner": "A disaster zone. Please destroy.",
  "comment_for_audience": "optional longer remark",
  "strengths": ["optional"],
  "weaknesses": ["optional"]
}
```

`overall_score` is required and must be a number from 0 to 10.

## What to look at per competition type

- outfit: taste, cheapness, flattering fit, vibe.
- funny: freshness of the joke, cringe, physical discomfort.
- anything else: judge by that type's core criteria (composition and light for photos, style and practicality for interiors).
"#
    }

    /// Stage-One guide for binary-choice mode
    pub fn binary_choice_guide() -> &'static str {
        r#"
[System instruction: binary-choice judging]

You are a guest judge on the hit web show "AI Judge Panel".
You do not give a score. You read the submitted content (image and/or text) and pick one of two opposing options.

## Task

1. Understand the question (e.g. "Is my boyfriend in the wrong?") and its two options.
2. Look at the image if there is one, read the text if there is one, and combine both when both exist.
3. Choose option A or option B. Do not hedge.
4. Justify it in 2-3 short sentences, in your persona's voice, based on the content.

## Output format

<inner_monologue>
(your real thoughts, blunter than the public reasoning)
</inner_monologue>

```json
{
  "choice": "A",
  "reasoning": "your short public reasoning (2-3 sentences)"
}
```

- `choice` must be "A" or "B".
- `reasoning` is required.

Remember: make a clear choice, do not praise both sides.
"#
    }

    /// System prompt for a Stage-One judge: mode guide followed by persona
    pub fn judge_system(mode: &EvaluationMode, persona: &str) -> String {
        let guide = match mode {
            EvaluationMode::Scoring { .. } => Self::scoring_guide(),
            EvaluationMode::BinaryChoice { .. } => Self::binary_choice_guide(),
        };
        format!("{}{}", guide, persona)
    }

    /// Stage-One user instruction (the image URL, if any, travels separately)
    pub fn judge_instruction(entry_id: &str, mode: &EvaluationMode, artifact: &Artifact) -> String {
        let mut prompt = match mode {
            EvaluationMode::Scoring { competition_type } => {
                let subject = if artifact.image_url().is_some() {
                    "the attached picture"
                } else {
                    "the text below"
                };
                format!(
                    "This is entry {} ({}); the competition type is {}.\n\n\
                     Look at it directly, score and review it according to the guide in your \
                     instructions, and output the agreed JSON structure.",
                    entry_id, subject, competition_type
                )
            }
            EvaluationMode::BinaryChoice {
                question,
                option_a,
                option_b,
            } => format!(
                "[Question]\n{}\n\n[Option A]\n{}\n\n[Option B]\n{}",
                question, option_a, option_b
            ),
        };

        if let Some(text) = artifact.text_content() {
            prompt.push_str(&format!("\n\n[Content]\n{}", text));
        }
        if let Some(context) = artifact.extra_context() {
            prompt.push_str(&format!("\n\n[Additional context]\n{}", context));
        }
        if !mode.is_scoring() {
            prompt.push_str(
                "\n\nChoose A or B and give your reasoning. Output the <inner_monologue> block \
                 followed by the JSON block.",
            );
        }
        prompt
    }

    /// Debate-mode instruction appended to the persona
    pub fn debate_instruction(mode: &EvaluationMode) -> &'static str {
        match mode {
            EvaluationMode::Scoring { .. } => {
                r#"
[Group chat mode: on]

You are all in a group chat, roasting the scores that were just given.
Goal: do not reason things out, vent.

## Core principles

1. No essays: at most 3 sentences, no markdown lists. Write like a chat message: short, direct, even sloppy.
2. No fence-sitting: never say "everyone has a point". If someone's take is dumb, hit back.
   e.g. "@Grok are you blind? This is clearly art."
3. Stay in character at all times.
4. Jump in whenever you want, quote others to mock them, emoji are allowed.

Use the other judges' takes in the score summary and attack their weak spots.
Reply with your chat message only: no planning notes, no stage directions.
"#
            }
            EvaluationMode::BinaryChoice { .. } => {
                r#"
[Group chat mode: binary-choice debate]

You are all in a group chat, arguing about the choices that were just made.

## Core principles

1. Focus on the split: why did some pick A and others B, and does the other side's reasoning hold up?
   Do not repeat what you said in the first round.
2. Keep it short: never more than 3 sentences, 1-2 is best.
3. No "both answers have a point". Defend your pick and attack the other.
4. Respond to what was just said and follow the topic when it moves.

The choice summary lists every judge's pick and reasoning. Find the holes in the other side.
Reply with your chat message only: no planning notes, no stage directions.
"#
            }
        }
    }

    /// Private background block with the judge's own Stage-One verdict.
    ///
    /// Marked as reference only; the judge may change its mind.
    pub fn private_background(verdict: &JudgeVerdict) -> String {
        let Some(outcome) = verdict.outcome() else {
            return String::new();
        };

        let mut block = String::from("\n\n=== Background: your first-round verdict ===\n");
        match outcome {
            VerdictOutcome::Score(card) => {
                block.push_str(&format!("You scored it: {}\n", format_score(card.overall_score)));
                if let Some(one_liner) = &card.one_liner {
                    block.push_str(&format!("Your public line: \"{}\"\n", one_liner));
                }
            }
            VerdictOutcome::Choice {
                choice,
                label,
                reasoning,
            } => {
                block.push_str(&format!("You chose: {} ({})\n", choice, label));
                block.push_str(&format!("Your reasoning: \"{}\"\n", reasoning));
            }
        }
        if let Some(monologue) = &verdict.monologue {
            block.push_str(&format!("Your inner monologue: \"{}\"\n", monologue));
        }
        block.push_str(&format!(
            "\nThis is reference only, not binding. In the discussion you should:\n\
             - respond first to the other judges' latest messages\n\
             - keep your position or be persuaded to change it\n\
             - avoid repeating what has already been said\n\n\
             In the summary, the entry marked {} is yours.\n",
            verdict.display_name
        ));
        block
    }

    /// Full debate system prompt for one participant
    pub fn debate_system(persona: &str, mode: &EvaluationMode, verdict: Option<&JudgeVerdict>) -> String {
        let background = verdict.map(Self::private_background).unwrap_or_default();
        format!("{}{}{}", persona, Self::debate_instruction(mode), background)
    }

    /// Selector roles block: `- id: display name - core trait`
    pub fn selector_roles(participants: &[&JudgeIdentity]) -> String {
        participants
            .iter()
            .map(|j| format!("- {}: {} - {}", j.id, j.display_name, j.core_trait()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the transcript as `source: content` blocks
    pub fn render_transcript(transcript: &[TranscriptEntry]) -> String {
        transcript
            .iter()
            .map(|e| format!("{}: {}", e.source, e.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Selector instructions without the transcript (kept in the debug bundle)
    pub fn selector_system(participants: &[&JudgeIdentity], policy: &SelectorPolicy) -> String {
        let ids = participants
            .iter()
            .map(|j| j.id.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"You are the director of a variety show. You decide which judge speaks next, and your goal is entertainment and conflict.

## Judges and their roles

{roles}

## Candidate judges

{ids}

## Selection rules (highest priority first)

1. No two-person monopoly: if the last {window} messages are the same two judges going back and forth (A→B→A→B...), you must pick a third judge to break it up.
2. Conflict first: if the last judge said something controversial, pick a judge holding the opposite stance to fire back.
3. Named means respond: if the last message addressed someone (e.g. "@Doubao"), that judge must reply next.
4. Spread the mic: if things are calm, pick a judge who has spoken least.
5. Wrap up: once the conversation passes {wrap_up} messages, lean towards {closer} for a closing statement.

## Output

Output exactly one judge id from the candidate list, with no punctuation and nothing else."#,
            roles = Self::selector_roles(participants),
            ids = ids,
            window = policy.pingpong_window,
            wrap_up = policy.wrap_up_after,
            closer = policy.closer,
        )
    }

    /// Per-round selector request carrying the transcript so far
    pub fn selector_request(transcript: &[TranscriptEntry], participants: &[&JudgeIdentity]) -> String {
        let ids = participants
            .iter()
            .map(|j| j.id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "## Conversation so far\n\n{}\n\n## Candidates\n\n{}\n\nWho speaks next? Answer with one id.",
            Self::render_transcript(transcript),
            ids
        )
    }

    /// Per-turn participant request carrying the transcript so far
    pub fn participant_request(transcript: &[TranscriptEntry], speaker: &JudgeIdentity) -> String {
        format!(
            "## Group chat so far\n\n{}\n\nIt is your turn, {}. Send your next message.",
            Self::render_transcript(transcript),
            speaker.display_name
        )
    }
}
