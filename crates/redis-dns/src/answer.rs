//! Answer synthesis per query type.

use tracing::debug;

use super::names::ensure_trailing_dot;
use super::types::Answer;
use super::types::AnswerData;
use super::types::QueryType;
use super::types::Record;
use super::types::SoaData;
use super::zone::ZoneAuthority;

/// Turns a resolved record into answer records for one question.
#[derive(Clone)]
pub struct AnswerBuilder {
    authority: ZoneAuthority,
}

impl AnswerBuilder {
    /// Create a builder for the zone served by `authority`.
    pub fn new(authority: ZoneAuthority) -> Self {
        Self { authority }
    }

    /// Zone authority backing this builder.
    pub fn authority(&self) -> &ZoneAuthority {
        &self.authority
    }

    /// Answers for `query_type` on `name` (a normalized FQDN).
    ///
    /// No record means no answers, whatever the type. NS and SOA are only
    /// answered at the apex. CNAME and ANY return the host composite: the
    /// alias, then IPv4, then IPv6 addresses.
    pub async fn build(&self, query_type: QueryType, name: &str, record: Option<&Record>) -> Vec<Answer> {
        let Some(record) = record else {
            return Vec::new();
        };

        let answers = match query_type {
            QueryType::NS => self.ns(name, record).await,
            QueryType::SOA => self.soa(name, record).await.into_iter().collect(),
            QueryType::MX => self.mx(name, record),
            QueryType::A => a(name, record),
            QueryType::AAAA => aaaa(name, record),
            QueryType::CNAME | QueryType::ANY => host(name, record),
            QueryType::Other(code) => {
                debug!(name = %name, query_type = code, "unsupported query type");
                Vec::new()
            }
        };

        debug!(name = %name, query_type = %query_type, count = answers.len(), "built answers");
        answers
    }

    /// The zone's own SOA, placed in the authority section of empty answers.
    pub async fn negative_soa(&self) -> Answer {
        let zone = self.authority.config();
        self.soa_answer(&zone.apex, self.authority.primary_name_server().await, zone.mailbox.clone()).await
    }

    async fn ns(&self, name: &str, record: &Record) -> Vec<Answer> {
        if !self.authority.config().is_apex(name) {
            return Vec::new();
        }
        self.name_servers_for(record)
            .await
            .into_iter()
            .map(|server| Answer {
                name: name.to_string(),
                ttl: record.ttl,
                data: AnswerData::NS(server),
            })
            .collect()
    }

    async fn soa(&self, name: &str, record: &Record) -> Option<Answer> {
        let zone = self.authority.config();
        if !zone.is_apex(name) {
            return None;
        }
        let mname = match self.name_servers_for(record).await.into_iter().next() {
            Some(server) => server,
            None => zone.hostname.clone(),
        };
        let rname = if record.mailbox.is_empty() {
            zone.mailbox.clone()
        } else {
            ensure_trailing_dot(&record.mailbox)
        };
        Some(self.soa_answer(name, mname, rname).await)
    }

    async fn soa_answer(&self, name: &str, mname: String, rname: String) -> Answer {
        let zone = self.authority.config();
        Answer {
            name: name.to_string(),
            ttl: zone.soa_ttl,
            data: AnswerData::SOA(SoaData {
                mname,
                rname,
                serial: self.authority.current_serial().await,
                refresh: zone.soa_refresh,
                retry: zone.soa_retry,
                expire: zone.soa_expire,
                minimum: zone.soa_minimum,
            }),
        }
    }

    fn mx(&self, name: &str, record: &Record) -> Vec<Answer> {
        let preference = self.authority.config().mx_preference;
        record
            .mail_servers
            .iter()
            .map(|exchange| Answer {
                name: name.to_string(),
                ttl: record.ttl,
                data: AnswerData::MX {
                    preference,
                    exchange: ensure_trailing_dot(exchange),
                },
            })
            .collect()
    }

    /// Name servers stored on the record, falling back to the zone's list.
    async fn name_servers_for(&self, record: &Record) -> Vec<String> {
        if record.name_servers.is_empty() {
            self.authority.name_servers().await
        } else {
            record.name_servers.iter().map(|s| ensure_trailing_dot(s)).collect()
        }
    }
}

fn a(name: &str, record: &Record) -> Vec<Answer> {
    record
        .ipv4_addresses
        .iter()
        .map(|addr| Answer {
            name: name.to_string(),
            ttl: record.ttl,
            data: AnswerData::A(*addr),
        })
        .collect()
}

fn aaaa(name: &str, record: &Record) -> Vec<Answer> {
    record
        .ipv6_addresses
        .iter()
        .map(|addr| Answer {
            name: name.to_string(),
            ttl: record.ttl,
            data: AnswerData::AAAA(*addr),
        })
        .collect()
}

fn cname(name: &str, record: &Record) -> Option<Answer> {
    if record.cname.is_empty() {
        return None;
    }
    Some(Answer {
        name: name.to_string(),
        ttl: record.ttl,
        data: AnswerData::CNAME(ensure_trailing_dot(&record.cname)),
    })
}

fn host(name: &str, record: &Record) -> Vec<Answer> {
    let mut answers: Vec<Answer> = cname(name, record).into_iter().collect();
    answers.extend(a(name, record));
    answers.extend(aaaa(name, record));
    answers
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::net::Ipv6Addr;
    use std::sync::Arc;

    use redis_dns_store::InMemoryRecordStore;

    use super::*;
    use crate::config::NameServerSource;
    use crate::config::ZoneConfig;
    use crate::constants::NAME_SERVERS_KEY;
    use crate::constants::SERIAL_NUMBER_KEY;

    const APEX: &str = "example.com.";

    fn builder_with(store: Arc<InMemoryRecordStore>, zone: ZoneConfig) -> AnswerBuilder {
        AnswerBuilder::new(ZoneAuthority::new(store, Arc::new(zone)))
    }

    fn builder(store: Arc<InMemoryRecordStore>) -> AnswerBuilder {
        builder_with(store, ZoneConfig::new(APEX, "dns.example.com.", "hostmaster.example.com.").unwrap())
    }

    fn host_record() -> Record {
        Record {
            cname: "alias.example.com".into(),
            ipv4_addresses: vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)],
            ipv6_addresses: vec![Ipv6Addr::LOCALHOST],
            ttl: 120,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_record_no_answers() {
        let builder = builder(Arc::new(InMemoryRecordStore::new()));
        for query_type in [QueryType::A, QueryType::NS, QueryType::SOA, QueryType::ANY] {
            assert!(builder.build(query_type, APEX, None).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_a_answers_in_order() {
        let builder = builder(Arc::new(InMemoryRecordStore::new()));
        let answers = builder.build(QueryType::A, "www.example.com.", Some(&host_record())).await;
        assert_eq!(
            answers.iter().map(|a| a.data.clone()).collect::<Vec<_>>(),
            vec![AnswerData::A(Ipv4Addr::new(10, 0, 0, 1)), AnswerData::A(Ipv4Addr::new(10, 0, 0, 2))]
        );
        assert!(answers.iter().all(|a| a.ttl == 120 && a.name == "www.example.com."));
    }

    #[tokio::test]
    async fn test_a_empty_despite_ipv6() {
        let builder = builder(Arc::new(InMemoryRecordStore::new()));
        let record = Record {
            ipv6_addresses: vec![Ipv6Addr::LOCALHOST],
            ttl: 60,
            ..Default::default()
        };
        assert!(builder.build(QueryType::A, "www.example.com.", Some(&record)).await.is_empty());
        assert_eq!(builder.build(QueryType::AAAA, "www.example.com.", Some(&record)).await.len(), 1);
    }

    #[tokio::test]
    async fn test_host_composite_order() {
        let builder = builder(Arc::new(InMemoryRecordStore::new()));
        for query_type in [QueryType::CNAME, QueryType::ANY] {
            let kinds: Vec<QueryType> = builder
                .build(query_type, "www.example.com.", Some(&host_record()))
                .await
                .iter()
                .map(|a| a.data.query_type())
                .collect();
            assert_eq!(kinds, vec![QueryType::CNAME, QueryType::A, QueryType::A, QueryType::AAAA]);
        }

        let answers = builder.build(QueryType::CNAME, "www.example.com.", Some(&host_record())).await;
        assert_eq!(answers[0].data, AnswerData::CNAME("alias.example.com.".into()));
    }

    #[tokio::test]
    async fn test_mx_fixed_preference() {
        let builder = builder(Arc::new(InMemoryRecordStore::new()));
        let record = Record {
            mail_servers: vec!["mx1.example.com.".into(), "mx2.example.com".into()],
            ttl: 300,
            ..Default::default()
        };
        let answers = builder.build(QueryType::MX, APEX, Some(&record)).await;
        assert_eq!(
            answers.iter().map(|a| a.data.clone()).collect::<Vec<_>>(),
            vec![
                AnswerData::MX {
                    preference: 10,
                    exchange: "mx1.example.com.".into()
                },
                AnswerData::MX {
                    preference: 10,
                    exchange: "mx2.example.com.".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_ns_only_at_apex() {
        let store = Arc::new(InMemoryRecordStore::new());
        store.set(NAME_SERVERS_KEY, "ns1.example.com.,ns2.example.com.").await;
        let builder = builder(store);
        let record = Record {
            mailbox: "hostmaster.example.com.".into(),
            ttl: 300,
            ..Default::default()
        };

        let answers = builder.build(QueryType::NS, APEX, Some(&record)).await;
        assert_eq!(
            answers.iter().map(|a| a.data.clone()).collect::<Vec<_>>(),
            vec![AnswerData::NS("ns1.example.com.".into()), AnswerData::NS("ns2.example.com.".into())]
        );
        assert!(answers.iter().all(|a| a.ttl == 300));
        assert!(builder.build(QueryType::NS, "www.example.com.", Some(&record)).await.is_empty());
    }

    #[tokio::test]
    async fn test_ns_prefers_record_name_servers() {
        let store = Arc::new(InMemoryRecordStore::new());
        store.set(NAME_SERVERS_KEY, "zone-ns.example.com.").await;
        let builder = builder(store);
        let record = Record {
            name_servers: vec!["ns1.example.com".into()],
            ttl: 300,
            ..Default::default()
        };
        let answers = builder.build(QueryType::NS, APEX, Some(&record)).await;
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].data, AnswerData::NS("ns1.example.com.".into()));
    }

    #[tokio::test]
    async fn test_soa_at_apex() {
        let store = Arc::new(InMemoryRecordStore::new());
        store.set(SERIAL_NUMBER_KEY, "42").await;
        let zone = ZoneConfig::new(APEX, "dns.example.com.", "hostmaster.example.com.")
            .unwrap()
            .with_name_servers(NameServerSource::Static(vec!["ns1.example.com.".into(), "ns2.example.com.".into()]));
        let builder = builder_with(store, zone);
        let record = Record {
            mailbox: "admin.example.com".into(),
            ttl: 300,
            ..Default::default()
        };

        let answers = builder.build(QueryType::SOA, APEX, Some(&record)).await;
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].ttl, 60);
        assert_eq!(
            answers[0].data,
            AnswerData::SOA(SoaData {
                mname: "ns1.example.com.".into(),
                rname: "admin.example.com.".into(),
                serial: 42,
                refresh: 86_400,
                retry: 7_200,
                expire: 3_600,
                minimum: 60,
            })
        );

        assert!(builder.build(QueryType::SOA, "www.example.com.", Some(&record)).await.is_empty());
    }

    #[tokio::test]
    async fn test_soa_falls_back_to_zone_values() {
        let builder = builder(Arc::new(InMemoryRecordStore::new()));
        let record = Record {
            ipv4_addresses: vec![Ipv4Addr::new(10, 0, 0, 1)],
            ttl: 300,
            ..Default::default()
        };
        let answers = builder.build(QueryType::SOA, APEX, Some(&record)).await;
        let AnswerData::SOA(soa) = &answers[0].data else {
            panic!("expected SOA, got {:?}", answers[0].data);
        };
        assert_eq!(soa.mname, "dns.example.com.");
        assert_eq!(soa.rname, "hostmaster.example.com.");
        assert_eq!(soa.serial, 0);
    }

    #[tokio::test]
    async fn test_other_type_no_answers() {
        let builder = builder(Arc::new(InMemoryRecordStore::new()));
        assert!(builder.build(QueryType::Other(16), "www.example.com.", Some(&host_record())).await.is_empty());
    }

    #[tokio::test]
    async fn test_negative_soa() {
        let store = Arc::new(InMemoryRecordStore::new());
        store.set(SERIAL_NUMBER_KEY, "7").await;
        store.set(NAME_SERVERS_KEY, "ns1.example.com.").await;
        let soa = builder(store).negative_soa().await;
        assert_eq!(soa.name, APEX);
        assert_eq!(soa.ttl, 60);
        let AnswerData::SOA(data) = soa.data else {
            panic!("expected SOA");
        };
        assert_eq!(data.mname, "ns1.example.com.");
        assert_eq!(data.rname, "hostmaster.example.com.");
        assert_eq!(data.serial, 7);
    }
}
