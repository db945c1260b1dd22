//! Prompt text for showcase generation and link verification.

use linkkarma_core::{Category, ExtractedPage};

pub const CONTENT_SYSTEM_PROMPT: &str = "\
Você é um redator especialista em marketing de indicação no Brasil. \
Escreve vitrines claras, honestas e persuasivas para links de convite de serviços digitais.

Regras:
- Escreva em português do Brasil, com tom amigável e direto.
- Nunca invente valores de bônus, taxas ou prazos que não estejam na página ou em fontes confiáveis.
- Use a busca e o conteúdo da URL para confirmar o que o serviço oferece hoje.

Responda SOMENTE com um objeto JSON. Sem blocos de markdown, sem explicações, apenas JSON puro:
{
  \"title\": \"título chamativo da vitrine (até 60 caracteres)\",
  \"short_description\": \"resumo de uma ou duas frases\",
  \"service_name\": \"nome oficial do serviço\",
  \"what_is\": \"parágrafo explicando o que é o serviço\",
  \"advantages\": [\"vantagem 1\", \"vantagem 2\", \"vantagem 3\"],
  \"steps\": [\"passo 1\", \"passo 2\", \"passo 3\"],
  \"faq\": [
    {\"question\": \"pergunta\", \"answer\": \"resposta\"},
    {\"question\": \"pergunta\", \"answer\": \"resposta\"}
  ]
}

\"advantages\" deve ter exatamente 3 itens. \"steps\" deve ter pelo menos 3 itens. \
\"faq\" deve ter pelo menos 2 perguntas.";

pub fn build_content_prompt(page: &ExtractedPage, category: Category) -> String {
    let text = if page.text.is_empty() {
        "(não foi possível ler a página; use a busca para descobrir o serviço)"
    } else {
        page.text.as_str()
    };
    format!(
        "Crie a vitrine para este link de indicação.\n\
         \n\
         URL de indicação: {url}\n\
         Categoria: {label} ({category})\n\
         Contexto da categoria: {context}\n\
         \n\
         Título da página: {title}\n\
         Descrição da página: {description}\n\
         \n\
         Conteúdo da página:\n\
         {text}",
        url = page.url,
        label = category.label(),
        category = category.as_str(),
        context = category.prompt_context(),
        title = page.title,
        description = page.description,
    )
}

pub const SECURITY_SYSTEM_PROMPT: &str = "\
Você é um analista de segurança que avalia a reputação de links de indicação antes de publicá-los. \
Pesquise o domínio e o serviço em fontes de reputação: Reclame Aqui, Trustpilot, avaliações do Google, \
Reddit, sites de notícias e de defesa do consumidor, e bases de golpes e phishing.

Classifique o link:
- APROVADO: serviço legítimo e conhecido, sem indícios de golpe.
- SUSPEITO: pouca informação, reclamações relevantes ou sinais ambíguos.
- BLOQUEADO: golpe, phishing, pirâmide financeira ou imitação de marca.

Responda SOMENTE com um objeto JSON. Sem blocos de markdown, sem explicações, apenas JSON puro:
{
  \"status\": \"APROVADO\" | \"SUSPEITO\" | \"BLOQUEADO\",
  \"confidence\": número de 0 a 100,
  \"sources_checked\": [\"fontes consultadas\"],
  \"findings\": [\"principais descobertas\"],
  \"recommendation\": \"recomendação curta para o usuário\",
  \"details\": {
    \"positive_mentions\": número,
    \"negative_mentions\": número,
    \"scam_indicators\": [\"indícios de golpe encontrados\"],
    \"trustworthiness_score\": número de 0 a 100
  }
}";

const STRICT_FORMAT: &str = "\
ATENÇÃO: a resposta anterior não pôde ser lida. Responda APENAS com um objeto JSON. \
Comece com { e termine com }. Use somente aspas duplas. Não use vírgulas antes de } ou ].";

/// `attempt` is the zero-based attempt index; retries get stricter format rules.
pub fn build_security_prompt(url: &str, domain: &str, service_name: &str, attempt: u32) -> String {
    let mut prompt = format!(
        "Verifique a reputação deste link de indicação.\n\
         \n\
         URL: {url}\n\
         Domínio: {domain}\n\
         Serviço provável: {service_name}\n\
         \n\
         Procure por \"{service_name} é confiável\", \"{domain} golpe\" e \"{service_name} reclame aqui\"."
    );
    if attempt > 0 {
        prompt.push_str("\n\n");
        prompt.push_str(STRICT_FORMAT);
    }
    prompt
}
