//! Demo showcases loaded into the mock store at startup.

use chrono::{TimeDelta, Utc};
use linkkarma_core::{
    Category, FaqItem, SecurityCheckResult, SecurityDetails, SecurityStatus, Showcase,
    ShowcaseContent, ShowcaseStatus,
};

fn faq(pairs: &[(&str, &str)]) -> Vec<FaqItem> {
    pairs
        .iter()
        .map(|(q, a)| FaqItem {
            question: q.to_string(),
            answer: a.to_string(),
        })
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn approved(confidence: u8, sources: &[&str]) -> SecurityCheckResult {
    SecurityCheckResult {
        status: SecurityStatus::Approved,
        confidence,
        sources_checked: strings(sources),
        findings: strings(&["Empresa conhecida e regulamentada"]),
        recommendation: "Link seguro para divulgação".to_string(),
        details: Some(SecurityDetails {
            positive_mentions: 120,
            negative_mentions: 8,
            scam_indicators: Vec::new(),
            trustworthiness_score: confidence,
        }),
        checked_at: Utc::now(),
    }
}

pub fn seed_showcases() -> Vec<Showcase> {
    let now = Utc::now();

    vec![
        Showcase {
            id: "showcase-nubank-demo".to_string(),
            user_id: "demo-user-1".to_string(),
            title: "Ganhe cashback com o Nubank".to_string(),
            description: "Conta digital sem tarifas e cartão sem anuidade".to_string(),
            referral_url: "https://nubank.com.br/convite/demo".to_string(),
            category: Category::Banking,
            status: ShowcaseStatus::Published,
            content: ShowcaseContent {
                what_is: "O Nubank é um banco digital com conta gratuita e cartão de crédito \
                          sem anuidade, tudo gerenciado pelo aplicativo."
                    .to_string(),
                advantages: strings(&[
                    "Conta sem tarifas de manutenção",
                    "Cartão de crédito sem anuidade",
                    "Rendimento automático do saldo",
                ]),
                steps: strings(&[
                    "Acesse o link de convite",
                    "Baixe o aplicativo e preencha seus dados",
                    "Aguarde a aprovação e ative sua conta",
                ]),
                faq: faq(&[
                    ("A conta é gratuita?", "Sim, não há tarifa de manutenção."),
                    ("Preciso de comprovante de renda?", "Não para abrir a conta."),
                ]),
            },
            karma_boost: 120,
            featured_until: Some(now + TimeDelta::days(2)),
            security_check: Some(approved(96, &["Reclame Aqui", "Banco Central"])),
            created_at: now - TimeDelta::days(10),
            updated_at: now - TimeDelta::days(1),
        },
        Showcase {
            id: "showcase-binance-demo".to_string(),
            user_id: "demo-user-2".to_string(),
            title: "Desconto nas taxas da Binance".to_string(),
            description: "Corretora de criptomoedas com desconto para novos usuários".to_string(),
            referral_url: "https://www.binance.com/pt-BR/activity/referral/demo".to_string(),
            category: Category::Crypto,
            status: ShowcaseStatus::Published,
            content: ShowcaseContent {
                what_is: "A Binance é uma corretora global de criptomoedas com centenas de \
                          ativos disponíveis."
                    .to_string(),
                advantages: strings(&[
                    "Desconto nas taxas de negociação",
                    "Grande variedade de criptomoedas",
                    "Liquidez alta",
                ]),
                steps: strings(&[
                    "Cadastre-se pelo link",
                    "Verifique sua identidade",
                    "Faça o primeiro depósito",
                ]),
                faq: faq(&[
                    ("Existe risco?", "Sim, criptomoedas são voláteis."),
                    ("Qual o depósito mínimo?", "Depende do método de pagamento."),
                ]),
            },
            karma_boost: 45,
            featured_until: None,
            security_check: Some(approved(91, &["Trustpilot", "Reddit"])),
            created_at: now - TimeDelta::days(4),
            updated_at: now - TimeDelta::days(4),
        },
        Showcase {
            id: "showcase-ifood-demo".to_string(),
            user_id: "demo-user-1".to_string(),
            title: "Primeiro pedido com desconto no iFood".to_string(),
            description: "Cupom de boas-vindas para pedidos de delivery".to_string(),
            referral_url: "https://www.ifood.com.br/convite/demo".to_string(),
            category: Category::Delivery,
            status: ShowcaseStatus::Draft,
            content: ShowcaseContent::default(),
            karma_boost: 0,
            featured_until: None,
            security_check: None,
            created_at: now - TimeDelta::hours(6),
            updated_at: now - TimeDelta::hours(6),
        },
    ]
}
