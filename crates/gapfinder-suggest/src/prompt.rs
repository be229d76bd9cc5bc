//! Prompt text sent to the completion endpoint. Prompts are in French, like
//! the channels this tool targets.

use std::fmt::Write as _;

use gapfinder_core::{ChannelInfo, ContentGap, VideoSummary};

/// Gaps and corpus videos included in a prompt.
pub const PROMPT_ITEM_LIMIT: usize = 5;

/// System message shared by every request.
pub const SYSTEM_PROMPT: &str = "Tu es un expert en analyse de contenu YouTube et en stratégie de création de contenu.
Ta mission est d'analyser les données d'une chaîne YouTube et les opportunités de contenu identifiées pour suggérer des idées de vidéos pertinentes.
Tu dois tenir compte du style de la chaîne, de sa taille, et des opportunités spécifiques identifiées.
Tes suggestions doivent être précises, réalisables et alignées avec les opportunités de contenu identifiées.
Tu dois TOUJOURS répondre en format JSON valide selon le schéma demandé.";

const SUGGESTION_SCHEMA: &str = r#"{
    "suggestions": [
        {
            "title": "Titre accrocheur de la vidéo",
            "topic": "Opportunité exploitée",
            "description": "Description courte et engageante",
            "estimated_potential": "Estimation du potentiel de vues",
            "key_points": ["Point clé 1", "Point clé 2", "Point clé 3"]
        }
    ]
}"#;

const COMPETITION_SCHEMA: &str = r#"{
    "market_analysis": {
        "saturation_level": "élevé/moyen/faible",
        "unexplored_angles": ["angle 1", "angle 2"],
        "differentiators": ["différenciateur 1", "différenciateur 2"],
        "recommendations": ["recommandation 1", "recommandation 2"]
    }
}"#;

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        "Non spécifié"
    } else {
        value
    }
}

/// Ask for exactly five video ideas built on the highest-ranked gaps.
///
/// `gaps` is expected in ranked order; only the first
/// [`PROMPT_ITEM_LIMIT`] are described.
#[must_use]
pub fn build_suggestion_prompt(channel: &ChannelInfo, gaps: &[ContentGap]) -> String {
    let mut gaps_info = String::from("Opportunités de contenu identifiées:\n");
    for gap in gaps.iter().take(PROMPT_ITEM_LIMIT) {
        let _ = writeln!(
            gaps_info,
            "- Sujet: {}\n  Vues moyennes: {:.0}\n  Engagement moyen: {:.4}\n  Score d'opportunité: {:.3}",
            gap.topic, gap.average_views, gap.average_engagement, gap.opportunity_score
        );
    }

    format!(
        "Analyse les informations suivantes et génère des suggestions de contenu adaptées:

DONNÉES DE LA CHAÎNE:
Nom: {name}
Nombre d'abonnés: {subscribers}
Description: {description}

ANALYSE DES OPPORTUNITÉS:
{gaps_info}
INSTRUCTIONS:
1. Génère exactement 5 suggestions de vidéos
2. Chaque suggestion doit exploiter une des opportunités identifiées
3. Les suggestions doivent correspondre au style et à la taille de la chaîne
4. Le format des titres doit être accrocheur et optimisé pour YouTube
5. Les points clés doivent être spécifiques et actionables

Réponds UNIQUEMENT avec un JSON valide au format suivant, sans texte avant ou après:

{SUGGESTION_SCHEMA}",
        name = or_unspecified(&channel.title),
        subscribers = channel.subscriber_count.unwrap_or(0),
        description = or_unspecified(&channel.description),
    )
}

/// Ask for a market analysis of `topic` given the corpus videos already
/// covering it.
#[must_use]
pub fn build_competition_prompt(topic: &str, videos: &[VideoSummary]) -> String {
    let shown = &videos[..videos.len().min(PROMPT_ITEM_LIMIT)];
    let listing = serde_json::to_string_pretty(shown).unwrap_or_else(|_| "[]".to_owned());

    format!(
        "Analyse la concurrence pour le sujet suivant: {topic}

Vidéos existantes:
{listing}

Fournis une analyse détaillée incluant:
1. Angles non exploités
2. Points différenciants possibles
3. Niveau de saturation du marché
4. Suggestions d'approches uniques

Réponds uniquement avec un JSON au format suivant:
{COMPETITION_SCHEMA}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> ChannelInfo {
        ChannelInfo {
            id: "UC1".into(),
            title: "Chef Maison".into(),
            description: String::new(),
            subscriber_count: Some(15_400),
            video_count: None,
            view_count: None,
            uploads_playlist_id: None,
        }
    }

    fn gap(topic: &str, score: f64) -> ContentGap {
        ContentGap {
            topic: topic.into(),
            average_views: 1000.0,
            average_engagement: 0.05,
            opportunity_score: score,
        }
    }

    #[test]
    fn suggestion_prompt_lists_top_five_gaps() {
        let gaps: Vec<ContentGap> = ["a1", "a2", "a3", "a4", "a5", "a6"]
            .iter()
            .map(|t| gap(t, 0.085))
            .collect();
        let prompt = build_suggestion_prompt(&channel(), &gaps);

        assert!(prompt.contains("Nom: Chef Maison"));
        assert!(prompt.contains("Nombre d'abonnés: 15400"));
        assert!(prompt.contains("Description: Non spécifié"));
        assert!(prompt.contains("- Sujet: a5"));
        assert!(!prompt.contains("- Sujet: a6"));
        assert!(prompt.contains("Score d'opportunité: 0.085"));
        assert!(prompt.contains("\"suggestions\""));
    }

    #[test]
    fn competition_prompt_embeds_first_videos_as_json() {
        let videos: Vec<VideoSummary> = (0..7)
            .map(|i| VideoSummary {
                video_id: format!("v{i}"),
                channel_id: "UC2".into(),
                title: format!("Pizza {i}"),
                view_count: 100,
                engagement_rate: 0.01,
            })
            .collect();
        let prompt = build_competition_prompt("pizza", &videos);

        assert!(prompt.starts_with("Analyse la concurrence pour le sujet suivant: pizza"));
        assert!(prompt.contains("\"video_id\": \"v4\""));
        assert!(!prompt.contains("\"v5\""));
        assert!(prompt.contains("\"market_analysis\""));
    }
}
