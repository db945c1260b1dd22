//! Showcase categories and the per-category context fed to the content prompt.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Referral categories a showcase can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Banking,
    Investments,
    Crypto,
    Ecommerce,
    Delivery,
    Transport,
    Travel,
    Telecom,
    Games,
    Services,
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Self::Banking,
        Self::Investments,
        Self::Crypto,
        Self::Ecommerce,
        Self::Delivery,
        Self::Transport,
        Self::Travel,
        Self::Telecom,
        Self::Games,
        Self::Services,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Banking => "banking",
            Self::Investments => "investments",
            Self::Crypto => "crypto",
            Self::Ecommerce => "ecommerce",
            Self::Delivery => "delivery",
            Self::Transport => "transport",
            Self::Travel => "travel",
            Self::Telecom => "telecom",
            Self::Games => "games",
            Self::Services => "services",
            Self::Other => "other",
        }
    }

    /// User-facing label (pt-BR).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Banking => "Bancos Digitais",
            Self::Investments => "Investimentos",
            Self::Crypto => "Criptomoedas",
            Self::Ecommerce => "Compras Online",
            Self::Delivery => "Delivery",
            Self::Transport => "Transporte",
            Self::Travel => "Viagens",
            Self::Telecom => "Telefonia e Internet",
            Self::Games => "Jogos",
            Self::Services => "Serviços",
            Self::Other => "Outros",
        }
    }

    /// What the model should emphasise when writing copy for this category.
    pub fn prompt_context(&self) -> &'static str {
        match self {
            Self::Banking => {
                "Banco digital ou conta de pagamento. Destaque isenção de tarifas, cartão de crédito, \
                 cashback, rendimento da conta e facilidade de abertura pelo aplicativo."
            }
            Self::Investments => {
                "Plataforma de investimentos. Destaque variedade de produtos, taxas, segurança \
                 regulatória (CVM, Banco Central) e bônus de indicação. Nunca prometa rentabilidade."
            }
            Self::Crypto => {
                "Corretora de criptomoedas. Destaque segurança da custódia, taxas de negociação, \
                 moedas disponíveis e recompensas de cadastro. Mencione os riscos de volatilidade."
            }
            Self::Ecommerce => {
                "Loja ou marketplace online. Destaque cupons de primeira compra, frete, cashback e \
                 programas de fidelidade."
            }
            Self::Delivery => {
                "Aplicativo de entrega. Destaque descontos no primeiro pedido, cobertura de \
                 restaurantes e mercados, e assinaturas de frete grátis."
            }
            Self::Transport => {
                "Mobilidade urbana. Destaque créditos na primeira viagem, segurança, categorias de \
                 veículo e cobertura de cidades."
            }
            Self::Travel => {
                "Viagens e hospedagem. Destaque créditos para a primeira reserva, cancelamento \
                 flexível e variedade de destinos."
            }
            Self::Telecom => {
                "Operadora de telefonia ou internet. Destaque planos, bônus de dados, cobertura e \
                 portabilidade."
            }
            Self::Games => {
                "Jogo ou plataforma de jogos. Destaque recompensas de boas-vindas, itens exclusivos \
                 e comunidade. Não mencione apostas com dinheiro real."
            }
            Self::Services => {
                "Serviço por assinatura ou utilitário. Destaque período de teste, benefícios do \
                 plano e economia para quem se cadastra pelo convite."
            }
            Self::Other => {
                "Serviço geral. Destaque o benefício concreto que a pessoa recebe ao se cadastrar \
                 pelo link de indicação."
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Subscription tier used for rate limiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserTier {
    #[default]
    Free,
    Premium,
    Pro,
}

impl UserTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
            Self::Pro => "pro",
        }
    }
}

impl fmt::Display for UserTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            "pro" => Ok(Self::Pro),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}
