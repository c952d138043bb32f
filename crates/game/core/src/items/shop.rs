//! Shop stock generation and pricing.

use super::{Equipment, Item, ItemIdGen, Potion};
use crate::config::ShopConfig;
use crate::env::RngSource;
use crate::stats::StatKind;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShopOffer {
    pub item: Item,
    pub price: u32,
}

/// Items on sale during one shop visit.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShopStock {
    offers: Vec<ShopOffer>,
}

impl ShopStock {
    /// One large healing potion, one stat potion and one piece of equipment.
    pub fn generate(
        room: u32,
        luck: u8,
        prices: &ShopConfig,
        rooms_per_level: u32,
        ids: &mut ItemIdGen,
        rng: &mut dyn RngSource,
    ) -> Self {
        let mut offers = vec![ShopOffer {
            item: Item::Potion(Potion::Healing {
                percent: Potion::LARGE_HEAL,
            }),
            price: prices.healing_potion_price,
        }];

        let pool = &StatKind::LEVEL_UP_POOL;
        let stat = pool[rng.index(pool.len())];
        offers.push(ShopOffer {
            item: Item::Potion(Potion::Stat(stat)),
            price: prices.stat_potion_price,
        });

        let item = Equipment::roll(ids.next_id(), room, luck, rooms_per_level, rng);
        offers.push(ShopOffer {
            price: prices.equipment_price * item.tier.rank(),
            item: Item::Equipment(item),
        });

        Self { offers }
    }

    pub fn offers(&self) -> &[ShopOffer] {
        &self.offers
    }

    /// Removes and returns the offer at `index`.
    pub fn take(&mut self, index: usize) -> Option<ShopOffer> {
        (index < self.offers.len()).then(|| self.offers.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    #[test]
    fn stock_layout_and_prices() {
        let mut rng = PcgRng::seeded(3);
        let mut ids = ItemIdGen::default();
        let prices = ShopConfig::default();
        let mut stock = ShopStock::generate(12, 0, &prices, 10, &mut ids, &mut rng);

        assert_eq!(stock.offers().len(), 3);
        assert_eq!(stock.offers()[0].price, prices.healing_potion_price);
        assert!(matches!(stock.offers()[1].item, Item::Potion(Potion::Stat(_))));
        let offer = &stock.offers()[2];
        let Item::Equipment(item) = &offer.item else {
            panic!("expected equipment");
        };
        assert_eq!(offer.price, prices.equipment_price * item.tier.rank());

        let bought = stock.take(0).unwrap();
        assert!(matches!(bought.item, Item::Potion(Potion::Healing { .. })));
        assert_eq!(stock.offers().len(), 2);
        assert!(stock.take(9).is_none());
    }
}
