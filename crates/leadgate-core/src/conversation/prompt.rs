//! System prompt rendering for the conversation engine.
//!
//! The prompt is a fixed persona/policy template plus a stage-dependent
//! suffix and, when the draft's sector matches the configured hint, a
//! topical suffix.

use leadgate_types::chat::{ConversationStage, LeadDraft};
use leadgate_types::config::ChatConfig;

/// Persona and policy template. The trailing instructions define the
/// structured-payload convention the extractor depends on: a fenced JSON
/// block with the fixed key set at the end of every reply, and the exact
/// hand-off sentence for human escalation.
const PERSONA_TEMPLATE: &str = "\
Você é **Ricardo Nogueira**, um assistente virtual da **People Change AI Consulting**, \
com um tom natural e conversacional, que fala com proximidade e empatia, sem parecer um robô.

Sua missão é:
1. Entender as dores do cliente e o contexto da empresa, criando conexão humana.
2. Explicar como a IA pode ajudar, focando nos benefícios práticos, sem revelar \
todos os detalhes técnicos.
3. Destacar a filosofia da People Change AI Consulting: a IA existe para complementar \
e potencializar o trabalho humano, não para substituí-lo.
4. Gerar curiosidade e desejo de saber mais, sem entregar toda a solução.
5. Coletar dados de contato (nome, e-mail, telefone) discretamente. Se algum dado já \
tiver sido coletado, não pedir novamente. Se o cliente recusar, respeitar e tentar \
novamente depois.
6. Retornar, ao final de cada resposta, um bloco JSON (invisível ao usuário) com a estrutura:
```
{
  \"nome\": <string ou null>,
  \"email\": <string ou null>,
  \"telefone\": <string ou null>,
  \"empresa\": <string ou null>,
  \"setor\": <string ou null>,
  \"interesse\": <string ou null>,
  \"mensagem\": <string ou null>,
  \"origem\": <string ou null>
}
```
   - Caso ainda não tenha algum campo, use `null`.
   - Não mostre esse JSON ao usuário e não comente que está coletando dados.
   - Se o usuário explicitamente pedir para falar com um atendente humano, responda apenas:
     `{sentinel}`";

/// Render the full system prompt for a turn.
pub fn render(stage: ConversationStage, draft: &LeadDraft, config: &ChatConfig) -> String {
    let mut prompt = PERSONA_TEMPLATE.replace("{sentinel}", &config.handoff_sentinel);

    match stage {
        ConversationStage::Novice => {
            prompt.push_str(
                "\n\nObservação: o usuário parece iniciante, explique de forma ainda mais simples.\n",
            );
        }
        ConversationStage::Advanced => {
            prompt.push_str(
                "\n\nObservação: o usuário já conhece um pouco de IA, pode ir mais direto ao ponto.\n",
            );
        }
    }

    if let Some(setor) = &draft.setor {
        if setor.eq_ignore_ascii_case(&config.sector_hint) {
            prompt.push_str(&format!(
                "\nObservação adicional: o usuário atua em {}. Cite exemplos de IA nessa área quando pertinente.\n",
                config.sector_hint
            ));
        }
    }

    prompt
}
